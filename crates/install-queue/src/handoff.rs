//! Downstream engines the queue hands resolved jobs to.

use std::future::Future;
use std::pin::Pin;

use burrow_models::InstallQueueResult;

use crate::context::JobContext;
use crate::error::QueueError;
use crate::types::ResolvedJob;

/// Prepares an install (strategy, receipts, disk checks) for a resolved job.
pub trait InstallPreparer: Send + Sync {
    /// Runs preparation inside the job's context.
    ///
    /// The queue always passes `allow_downloads = false`: fetching content
    /// is the download queue's business.
    fn prepare<'a>(
        &'a self,
        ctx: &'a JobContext,
        job: &'a ResolvedJob,
        allow_downloads: bool,
    ) -> Pin<Box<dyn Future<Output = Result<(), QueueError>> + Send + 'a>>;
}

/// Accepts prepared jobs for downloading.
pub trait DownloadQueue: Send + Sync {
    fn enqueue<'a>(
        &'a self,
        item: &'a InstallQueueResult,
    ) -> Pin<Box<dyn Future<Output = Result<(), QueueError>> + Send + 'a>>;
}
