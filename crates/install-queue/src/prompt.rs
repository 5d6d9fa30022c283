//! Interactive decisions delegated to the caller.
//!
//! Both prompts may wait indefinitely on a human. Cancellation is a
//! regular return value ([`UploadChoice::Aborted`], [`Confirmation::Decline`]),
//! never an error.

use std::future::Future;
use std::pin::Pin;

use burrow_models::Upload;

use crate::error::QueueError;

/// Reply from an upload chooser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadChoice {
    /// Index into the candidate list.
    Picked(usize),
    Aborted,
}

impl UploadChoice {
    /// Converts a wire reply where any negative index means "abort".
    pub fn from_index(index: i64) -> Self {
        usize::try_from(index).map_or(UploadChoice::Aborted, UploadChoice::Picked)
    }
}

/// Reply to the external-upload warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accept,
    Decline,
}

impl From<bool> for Confirmation {
    fn from(accepted: bool) -> Self {
        if accepted {
            Confirmation::Accept
        } else {
            Confirmation::Decline
        }
    }
}

/// Asks the caller to pick one of several compatible uploads.
pub trait UploadChooser: Send + Sync {
    fn pick_upload<'a>(
        &'a self,
        uploads: &'a [Upload],
    ) -> Pin<Box<dyn Future<Output = Result<UploadChoice, QueueError>> + Send + 'a>>;
}

/// Warns the caller that an upload is hosted outside the platform.
pub trait ExternalUploadConfirmer: Send + Sync {
    fn confirm_external_upload<'a>(
        &'a self,
        upload: &'a Upload,
    ) -> Pin<Box<dyn Future<Output = Result<Confirmation, QueueError>> + Send + 'a>>;
}
