//! Metadata served by the remote catalog.

use serde::{Deserialize, Serialize};

/// A game as described by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    /// Canonical page URL, e.g. `https://studio.example.io/overland`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub classification: String,
}

/// Where the bytes of an upload are served from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStorage {
    /// Plain file hosted by the platform.
    #[default]
    Hosted,
    /// Versioned upload backed by builds.
    Build,
    /// Link to a third-party host.
    External,
}

/// Operating systems an upload declares support for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPlatforms {
    #[serde(default)]
    pub windows: bool,
    #[serde(default)]
    pub linux: bool,
    #[serde(default)]
    pub osx: bool,
}

impl UploadPlatforms {
    /// Whether no platform is declared at all.
    pub fn is_empty(&self) -> bool {
        !self.windows && !self.linux && !self.osx
    }
}

/// A distributable artifact of a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    pub id: i64,
    #[serde(default)]
    pub filename: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(default)]
    pub storage: UploadStorage,
    /// Third-party host name, only meaningful for external storage.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    /// `default`, `html`, `soundtrack`, `book`, ...
    #[serde(default, rename = "type")]
    pub upload_type: String,
    #[serde(default)]
    pub demo: bool,
    #[serde(default)]
    pub preorder: bool,
    #[serde(default)]
    pub platforms: UploadPlatforms,
    #[serde(default)]
    pub size: i64,
    /// Current build, present on build-backed uploads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Build>,
}

impl Upload {
    /// Human-readable label: display name when set, filename otherwise.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.filename
        } else {
            &self.display_name
        }
    }
}

/// A versioned revision of a build-backed upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: i64,
    #[serde(default)]
    pub parent_build_id: i64,
    #[serde(default)]
    pub version: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_version: String,
}
