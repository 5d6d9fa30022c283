//! Install queue request/response payloads.

use serde::{Deserialize, Serialize};

use crate::catalog::{Build, Game, Upload};

/// Why a job is being queued. An empty reason on the wire means `install`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DownloadReason {
    #[default]
    #[serde(alias = "")]
    Install,
    Reinstall,
    Update,
    VersionSwitch,
}

/// A possibly ambiguous request to install something.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<Game>,
    /// Existing cave to install into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cave_id: Option<String>,
    /// Install location for a new cave. Required when `cave_id` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<Upload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Build>,
    /// Ephemeral install that is not tracked as a cave.
    #[serde(default)]
    pub no_cave: bool,
    /// Required with `no_cave`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_folder: Option<String>,
    /// Required with `no_cave`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_folder: Option<String>,
    #[serde(default)]
    pub reason: DownloadReason,
    /// Hand the prepared job to the download queue.
    #[serde(default)]
    pub queue_download: bool,
}

/// A fully resolved, queued install job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallQueueResult {
    pub id: String,
    pub reason: DownloadReason,
    /// Empty for no-cave jobs.
    #[serde(default)]
    pub cave_id: String,
    pub game: Game,
    pub upload: Upload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Build>,
    pub install_folder: String,
    pub staging_folder: String,
}
