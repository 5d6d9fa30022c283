//! Per-job working context rooted at the staging folder.
//!
//! The context owns the staging folder for the duration of a queue call.
//! The resolved job is stored there as `job.json` so whoever picks the job
//! up later (or after a restart) can read it back.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::QueueError;
use crate::types::ResolvedJob;

/// File holding the resolved job inside the staging folder.
pub const JOB_FILE: &str = "job.json";

/// Exclusive handle on a job's staging folder.
///
/// Dropping the context releases it. A staging folder created by this
/// context that never received job metadata is removed on release.
#[derive(Debug)]
pub struct JobContext {
    staging_folder: PathBuf,
    created: bool,
    saved: bool,
    retired: bool,
}

impl JobContext {
    /// Acquires the context, creating the staging folder if needed.
    pub fn load(staging_folder: impl Into<PathBuf>) -> Result<Self, QueueError> {
        let staging_folder = staging_folder.into();
        let created = !staging_folder.exists();
        std::fs::create_dir_all(&staging_folder)?;
        debug!(folder = %staging_folder.display(), created, "job context loaded");

        Ok(Self {
            staging_folder,
            created,
            saved: false,
            retired: false,
        })
    }

    /// The staging folder this context owns.
    pub fn staging_folder(&self) -> &Path {
        &self.staging_folder
    }

    /// Reads the job previously saved in this staging folder, if any.
    pub fn load_job(&self) -> Result<Option<ResolvedJob>, QueueError> {
        read_job(&self.staging_folder)
    }

    /// Persists the resolved job, replacing any previous one.
    pub fn save(&mut self, job: &ResolvedJob) -> Result<(), QueueError> {
        let json = serde_json::to_string_pretty(job)?;
        let path = self.staging_folder.join(JOB_FILE);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        self.saved = true;
        debug!(job = %job.id, path = %path.display(), "job metadata saved");
        Ok(())
    }

    /// Gives up on the job: deletes the staging folder and everything in it.
    pub fn retire(mut self) -> Result<(), QueueError> {
        self.retired = true;
        std::fs::remove_dir_all(&self.staging_folder)?;
        debug!(folder = %self.staging_folder.display(), "job context retired");
        Ok(())
    }
}

impl Drop for JobContext {
    fn drop(&mut self) {
        if self.retired {
            return;
        }
        if self.created
            && !self.saved
            && let Err(e) = std::fs::remove_dir(&self.staging_folder)
        {
            warn!(
                folder = %self.staging_folder.display(),
                error = %e,
                "could not remove unused staging folder"
            );
        }
        debug!(folder = %self.staging_folder.display(), "job context released");
    }
}

/// Reads a saved job from a staging folder without acquiring it.
pub fn read_job(staging_folder: &Path) -> Result<Option<ResolvedJob>, QueueError> {
    let path = staging_folder.join(JOB_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&data)?))
}
