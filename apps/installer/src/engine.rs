//! Local stand-ins for the install and download engines.
//!
//! The CLI does not download or extract anything itself. Preparation is a
//! dry run that checks the job layout and leaves a receipt; queued downloads
//! are appended to a JSON file for a downloader to pick up.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use burrow_install_queue::{DownloadQueue, InstallPreparer, JobContext, QueueError, ResolvedJob};
use burrow_models::InstallQueueResult;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Receipt written into the staging folder by [`DryRunPreparer`].
pub const RECEIPT_FILE: &str = "prepare.json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Receipt<'a> {
    job_id: &'a str,
    install_folder: &'a str,
    upload_id: i64,
    build_id: Option<i64>,
    allow_downloads: bool,
    install_folder_exists: bool,
}

/// Validates a job without touching the install folder.
pub struct DryRunPreparer;

impl InstallPreparer for DryRunPreparer {
    fn prepare<'a>(
        &'a self,
        ctx: &'a JobContext,
        job: &'a ResolvedJob,
        allow_downloads: bool,
    ) -> Pin<Box<dyn Future<Output = Result<(), QueueError>> + Send + 'a>> {
        Box::pin(async move {
            match ctx.load_job()? {
                Some(saved) if saved.id == job.id => {}
                Some(saved) => {
                    return Err(QueueError::Prepare(format!(
                        "staging folder holds job {} instead of {}",
                        saved.id, job.id
                    )));
                }
                None => return Err(QueueError::Prepare("job metadata missing".into())),
            }

            let install_folder = Path::new(&job.install_folder);
            if install_folder.is_file() {
                return Err(QueueError::Prepare(format!(
                    "install folder {} is a file",
                    install_folder.display()
                )));
            }

            let receipt = Receipt {
                job_id: &job.id,
                install_folder: &job.install_folder,
                upload_id: job.upload.id,
                build_id: job.build.as_ref().map(|b| b.id),
                allow_downloads,
                install_folder_exists: install_folder.is_dir(),
            };
            let path = ctx.staging_folder().join(RECEIPT_FILE);
            tokio::fs::write(&path, serde_json::to_vec_pretty(&receipt)?).await?;

            info!(
                job = %job.id,
                folder = %job.install_folder,
                reinstall = receipt.install_folder_exists,
                "install prepared (dry run)"
            );
            Ok(())
        })
    }
}

/// Download queue persisted as a JSON array of queued jobs.
pub struct FileDownloadQueue {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileDownloadQueue {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Reads all queued items.
    pub async fn items(&self) -> Result<Vec<InstallQueueResult>, QueueError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl DownloadQueue for FileDownloadQueue {
    fn enqueue<'a>(
        &'a self,
        item: &'a InstallQueueResult,
    ) -> Pin<Box<dyn Future<Output = Result<(), QueueError>> + Send + 'a>> {
        Box::pin(async move {
            let _guard = self.lock.lock().await;

            let mut items = self
                .items()
                .await
                .map_err(|e| QueueError::Enqueue(format!("reading {}: {e}", self.path.display())))?;
            items.retain(|queued| queued.id != item.id);
            items.push(item.clone());

            if let Some(parent) = self.path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let tmp = self.path.with_extension("json.tmp");
            tokio::fs::write(&tmp, serde_json::to_vec_pretty(&items)?).await?;
            tokio::fs::rename(&tmp, &self.path).await?;

            debug!(
                job = %item.id,
                queued = items.len(),
                path = %self.path.display(),
                "download queued"
            );
            Ok(())
        })
    }
}
