//! Entity resolution: where an install lives and under what identity.
//!
//! Reads from the store only. The cave built here is a draft; nothing is
//! written back to the store. A new cave gets its folder name from
//! [`name_install_folder`] after the catalog refresh.

use std::path::Path;

use burrow_models::{Cave, Game, InstallLocation, InstallRequest};
use burrow_store::Store;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::QueueError;
use crate::folder::{ensure_unique_folder_name, make_folder_name};
use crate::ids::generate_id;
use crate::types::JobDraft;

/// Resolves the job id, folders and cave for a request.
///
/// The returned draft also carries the game/upload/build known so far:
/// the request's, falling back to the cave's for any left unspecified.
pub fn resolve_entities(
    store: &dyn Store,
    request: &InstallRequest,
) -> Result<JobDraft, QueueError> {
    let mut draft = JobDraft::new(request.reason);
    draft.game = request.game.clone();
    draft.upload = request.upload.clone();
    draft.build = request.build.clone();

    if request.no_cave {
        let staging = non_empty(&request.staging_folder).ok_or_else(|| {
            QueueError::Validation("with noCave, stagingFolder must be specified".into())
        })?;
        let install = non_empty(&request.install_folder).ok_or_else(|| {
            QueueError::Validation("with noCave, installFolder must be specified".into())
        })?;

        draft.id = Uuid::new_v4().to_string();
        draft.staging_folder = staging.into();
        draft.install_folder = install.into();
        debug!(job = %draft.id, "resolved no-cave job");
        return Ok(draft);
    }

    let (cave, location) = match non_empty(&request.cave_id) {
        Some(cave_id) => {
            let (cave, location) = validate_cave(store, cave_id)?;
            if draft.game.is_none() {
                draft.game = cave.game.clone();
            }
            if draft.upload.is_none() {
                draft.upload = cave.upload.clone();
            }
            if draft.build.is_none() {
                draft.build = cave.build.clone();
            }
            (cave, location)
        }
        None => {
            let location_id = non_empty(&request.install_location_id).ok_or_else(|| {
                QueueError::Validation(
                    "when caveId is unspecified, installLocationId must be set".into(),
                )
            })?;
            let location = store.install_location_by_id(location_id)?.ok_or_else(|| {
                QueueError::NotFound(format!("install location not found ({location_id})"))
            })?;
            let cave = Cave {
                id: Uuid::new_v4().to_string(),
                install_location_id: location.id.clone(),
                ..Cave::default()
            };
            info!(cave = %cave.id, location = %location.id, "creating new cave");
            (cave, location)
        }
    };

    draft.id = generate_id(Path::new(&location.path));
    draft.staging_folder = location.staging_folder(&draft.id);

    if !cave.install_folder_name.is_empty() {
        draft.install_folder = cave.install_folder(&location);
    }
    debug!(
        job = %draft.id,
        cave = %cave.id,
        folder = %cave.install_folder_name,
        "resolved cave job"
    );
    draft.cave = Some(cave);
    draft.location = Some(location);
    Ok(draft)
}

/// Gives a cave without a folder name one derived from `game`, unique
/// within its install location, and sets the draft's install folder.
///
/// No-op for no-cave drafts. Aborts through [`crate::fatal::raise`] when no
/// unique name can be found.
pub fn name_install_folder(draft: &mut JobDraft, game: &Game) {
    let (Some(cave), Some(location)) = (draft.cave.as_mut(), draft.location.as_ref()) else {
        return;
    };

    if cave.install_folder_name.is_empty() {
        cave.install_folder_name = make_folder_name(game);
        ensure_unique_folder_name(cave, location);
        debug!(cave = %cave.id, folder = %cave.install_folder_name, "named install folder");
    }
    draft.install_folder = cave.install_folder(location);
}

/// Loads a cave and its install location, failing if either is missing.
pub fn validate_cave(
    store: &dyn Store,
    cave_id: &str,
) -> Result<(Cave, InstallLocation), QueueError> {
    let cave = store
        .cave_by_id(cave_id)?
        .ok_or_else(|| QueueError::NotFound(format!("cave not found ({cave_id})")))?;

    if cave.install_location_id.is_empty() {
        return Err(QueueError::Validation(format!(
            "cave ({cave_id}) has no install location"
        )));
    }

    let location = store
        .install_location_by_id(&cave.install_location_id)?
        .ok_or_else(|| {
            QueueError::NotFound(format!(
                "install location ({}) of cave ({cave_id}) not found",
                cave.install_location_id
            ))
        })?;

    Ok((cave, location))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
