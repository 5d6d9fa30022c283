//! Request orchestration.

use std::sync::Arc;

use burrow_catalog::{CatalogClient, Platform};
use burrow_models::{InstallQueueResult, InstallRequest};
use burrow_store::Store;
use tracing::{debug, info, warn};

use crate::context::JobContext;
use crate::entities::{name_install_folder, resolve_entities};
use crate::error::QueueError;
use crate::fatal;
use crate::handoff::{DownloadQueue, InstallPreparer};
use crate::prompt::{ExternalUploadConfirmer, UploadChooser};
use crate::reconcile::CatalogReconciler;

/// Turns install requests into prepared, optionally queued jobs.
///
/// One `InstallQueue` serves any number of requests; each call owns its
/// job exclusively. Calls for the same cave are not serialized here.
pub struct InstallQueue {
    store: Arc<dyn Store>,
    catalog: Arc<dyn CatalogClient>,
    preparer: Arc<dyn InstallPreparer>,
    downloads: Arc<dyn DownloadQueue>,
    platform: Platform,
}

impl InstallQueue {
    /// Creates a queue filtering uploads for the running platform.
    pub fn new(
        store: Arc<dyn Store>,
        catalog: Arc<dyn CatalogClient>,
        preparer: Arc<dyn InstallPreparer>,
        downloads: Arc<dyn DownloadQueue>,
    ) -> Self {
        Self {
            store,
            catalog,
            preparer,
            downloads,
            platform: Platform::current(),
        }
    }

    /// Filters uploads for `platform` instead of the running one.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Resolves, persists and prepares an install.
    ///
    /// The chooser and confirmer are only consulted when the catalog leaves
    /// a decision open. Declining either yields [`QueueError::OperationAborted`].
    ///
    /// A few non-recoverable conditions unwind instead of returning; use
    /// [`InstallQueue::queue_supervised`] to get them as [`QueueError::Fatal`].
    pub async fn queue(
        &self,
        request: &InstallRequest,
        chooser: &dyn UploadChooser,
        confirmer: &dyn ExternalUploadConfirmer,
    ) -> Result<InstallQueueResult, QueueError> {
        let has_cave = request.cave_id.as_deref().is_some_and(|id| !id.is_empty());
        if request.game.is_none() && !has_cave {
            return Err(QueueError::Validation("missing game".into()));
        }

        let mut draft = resolve_entities(self.store.as_ref(), request)?;
        let game = draft
            .game
            .take()
            .ok_or_else(|| QueueError::Validation("missing game in install".into()))?;
        let access = self.store.access_for_game(game.id)?;

        let mut ctx = JobContext::load(&draft.staging_folder)?;

        let reconciler = CatalogReconciler::new(
            self.catalog.as_ref(),
            chooser,
            confirmer,
            self.platform,
        );
        let catalog = reconciler
            .reconcile(&access, game, draft.upload.take(), draft.build.take())
            .await?;
        name_install_folder(&mut draft, &catalog.game);

        let job = draft.finish(access, catalog);
        ctx.save(&job)?;

        debug!(job = %job.id, "preparing install");
        if let Err(e) = self.preparer.prepare(&ctx, &job, false).await {
            warn!(job = %job.id, error = %e, "install preparation failed, retiring job");
            if let Err(retire_err) = ctx.retire() {
                warn!(job = %job.id, error = %retire_err, "could not retire job context");
            }
            return Err(e);
        }
        drop(ctx);

        let result = job.to_result();
        if request.queue_download {
            self.downloads.enqueue(&result).await?;
            debug!(job = %result.id, "handed to download queue");
        }

        info!(
            job = %result.id,
            cave = %result.cave_id,
            game = result.game.id,
            upload = result.upload.id,
            build = result.build.as_ref().map(|b| b.id),
            reason = ?result.reason,
            queued = request.queue_download,
            "install queued"
        );
        Ok(result)
    }

    /// [`InstallQueue::queue`] with non-recoverable conditions reported as errors.
    pub async fn queue_supervised(
        &self,
        request: &InstallRequest,
        chooser: &dyn UploadChooser,
        confirmer: &dyn ExternalUploadConfirmer,
    ) -> Result<InstallQueueResult, QueueError> {
        fatal::supervise(self.queue(request, chooser, confirmer)).await
    }
}
