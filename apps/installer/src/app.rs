//! Wires the store, catalog and engines into an install queue and runs one request.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use burrow_catalog::HttpCatalog;
use burrow_install_queue::InstallQueue;
use burrow_models::{InstallQueueResult, InstallRequest};
use burrow_store::JsonStore;

use crate::config::Config;
use crate::engine::{DryRunPreparer, FileDownloadQueue};
use crate::prompts::TerminalPrompts;

/// Queues the install described by the JSON file at `request_path`.
///
/// Returns `None` when the user cancelled.
pub async fn run(
    config: Config,
    request_path: &Path,
) -> anyhow::Result<Option<InstallQueueResult>> {
    let data = tokio::fs::read_to_string(request_path)
        .await
        .with_context(|| format!("reading {}", request_path.display()))?;
    let request: InstallRequest = serde_json::from_str(&data)
        .with_context(|| format!("parsing install request {}", request_path.display()))?;

    let store = Arc::new(JsonStore::open(config.store_path())?);
    let catalog = Arc::new(HttpCatalog::new().with_base_url(config.api_base_url.clone()));
    let downloads = Arc::new(FileDownloadQueue::new(config.queue_path()));
    let queue = InstallQueue::new(store, catalog, Arc::new(DryRunPreparer), downloads)
        .with_platform(config.platform()?);

    let prompts = TerminalPrompts::stdin();
    match queue.queue_supervised(&request, &prompts, &prompts).await {
        Ok(result) => Ok(Some(result)),
        Err(e) if e.is_aborted() => {
            tracing::info!("install cancelled");
            Ok(None)
        }
        Err(e) => {
            tracing::error!(code = ?e.code(), "install failed: {e}");
            Err(e.into())
        }
    }
}
