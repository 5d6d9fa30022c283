//! Resolves install requests into uniquely identified, persisted install jobs.
//!
//! An [`InstallRequest`](burrow_models::InstallRequest) names a game and
//! optionally a cave, install location, upload or build. The queue turns it
//! into a [`ResolvedJob`] and hands it to an install preparer. It is a library
//! crate with no UI or transport dependencies: the caller supplies the
//! chooser/confirmer prompts and the downstream engines as trait objects.
//!
//! # Pipeline
//!
//! 1. **Entities**: pick or create the cave, install location, job id and folders
//! 2. **Access**: look up catalog credentials for the game
//! 3. **Catalog**: refresh the game, settle on an upload and build, confirm external uploads
//! 4. **Persist**: write the resolved job into its staging folder
//! 5. **Prepare**: run install preparation without downloading
//! 6. **Queue**: optionally hand the job to the download queue

pub mod context;
pub mod entities;
pub mod error;
pub mod fatal;
pub mod folder;
pub mod handoff;
pub mod ids;
pub mod prompt;
pub mod queue;
pub mod reconcile;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export primary types for convenience.
pub use context::JobContext;
pub use error::QueueError;
pub use handoff::{DownloadQueue, InstallPreparer};
pub use prompt::{Confirmation, ExternalUploadConfirmer, UploadChoice, UploadChooser};
pub use queue::InstallQueue;
pub use reconcile::{CatalogReconciler, Reconciled};
pub use types::{JobDraft, ResolvedJob};
