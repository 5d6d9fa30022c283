//! Records owned by the local store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::{Build, Game, Upload};

/// Name of the directory, under an install location, holding staging folders.
pub const STAGING_DIR: &str = "downloads";

/// A named root path under which caves and staging folders live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallLocation {
    pub id: String,
    pub path: String,
}

impl InstallLocation {
    /// Staging folder used while a job with the given id is prepared.
    pub fn staging_folder(&self, job_id: &str) -> PathBuf {
        PathBuf::from(&self.path).join(STAGING_DIR).join(job_id)
    }

    /// Install folder for a cave folder name under this location.
    pub fn install_folder(&self, folder_name: &str) -> PathBuf {
        PathBuf::from(&self.path).join(folder_name)
    }
}

/// A persistent record of one installed piece of content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cave {
    pub id: String,
    #[serde(default)]
    pub install_location_id: String,
    /// Folder name, unique among caves of the same install location.
    #[serde(default)]
    pub install_folder_name: String,
    /// Absolute folder overriding `<location>/<install_folder_name>`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub custom_install_folder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<Game>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<Upload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Build>,
}

impl Cave {
    /// Resolves the folder this cave is (or will be) installed to.
    pub fn install_folder(&self, location: &InstallLocation) -> PathBuf {
        if self.custom_install_folder.is_empty() {
            location.install_folder(&self.install_folder_name)
        } else {
            PathBuf::from(&self.custom_install_folder)
        }
    }
}

/// Credentials attached to catalog requests for a given game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCredentials {
    /// Download key proving ownership, 0 when none.
    #[serde(default)]
    pub download_key_id: i64,
}

/// API key and per-game credentials used to talk to the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Access {
    pub api_key: String,
    #[serde(default)]
    pub credentials: GameCredentials,
}
