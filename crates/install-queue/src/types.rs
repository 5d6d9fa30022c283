//! Job types assembled while resolving a request.

use std::path::PathBuf;

use burrow_models::{
    Access, Build, Cave, DownloadReason, Game, InstallLocation, InstallQueueResult, Upload,
};
use serde::{Deserialize, Serialize};

use crate::reconcile::Reconciled;

/// A job under construction.
///
/// Filled in by the entity resolver (identity, folders, cave draft and the
/// game/upload/build known so far). A new cave's install folder is named
/// once the catalog has refreshed the game, then the draft is completed by
/// [`JobDraft::finish`]. Nothing is persisted while a draft exists.
#[derive(Debug, Clone, Default)]
pub struct JobDraft {
    pub id: String,
    pub reason: DownloadReason,
    pub staging_folder: PathBuf,
    pub install_folder: PathBuf,
    /// New or existing cave; `None` for no-cave jobs.
    pub cave: Option<Cave>,
    /// Install location of the cave.
    pub location: Option<InstallLocation>,
    pub game: Option<Game>,
    pub upload: Option<Upload>,
    pub build: Option<Build>,
}

impl JobDraft {
    /// Starts a draft for a request with the given reason.
    pub fn new(reason: DownloadReason) -> Self {
        Self {
            reason,
            ..Self::default()
        }
    }

    /// Completes the draft with credentials and catalog decisions.
    pub fn finish(self, access: Access, catalog: Reconciled) -> ResolvedJob {
        let (install_location_id, install_folder_name) = match &self.cave {
            Some(cave) => (
                cave.install_location_id.clone(),
                cave.install_folder_name.clone(),
            ),
            None => (String::new(), String::new()),
        };

        ResolvedJob {
            id: self.id,
            reason: self.reason,
            staging_folder: self.staging_folder.to_string_lossy().into_owned(),
            install_folder: self.install_folder.to_string_lossy().into_owned(),
            install_location_id,
            install_folder_name,
            no_cave: self.cave.is_none(),
            cave: self.cave,
            game: catalog.game,
            upload: catalog.upload,
            build: catalog.build,
            access,
        }
    }
}

/// A fully concrete install plan.
///
/// Persisted into the job's staging folder so an interrupted job can be
/// picked up again, and returned (as [`InstallQueueResult`]) to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedJob {
    pub id: String,
    pub reason: DownloadReason,
    pub staging_folder: String,
    pub install_folder: String,
    #[serde(default)]
    pub install_location_id: String,
    #[serde(default)]
    pub install_folder_name: String,
    #[serde(default)]
    pub no_cave: bool,
    /// Cave the install will be recorded as. Committed by the install engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cave: Option<Cave>,
    pub game: Game,
    pub upload: Upload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Build>,
    pub access: Access,
}

impl ResolvedJob {
    /// Cave id, empty for no-cave jobs.
    pub fn cave_id(&self) -> &str {
        self.cave.as_ref().map_or("", |c| c.id.as_str())
    }

    /// Caller-facing summary of the job.
    pub fn to_result(&self) -> InstallQueueResult {
        InstallQueueResult {
            id: self.id.clone(),
            reason: self.reason,
            cave_id: self.cave_id().to_string(),
            game: self.game.clone(),
            upload: self.upload.clone(),
            build: self.build.clone(),
            install_folder: self.install_folder.clone(),
            staging_folder: self.staging_folder.clone(),
        }
    }
}
