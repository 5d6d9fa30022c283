//! Upload compatibility filtering and diagnostics.

use std::fmt;

use burrow_models::{Access, Build, Game, Upload, UploadStorage};
use tracing::info;

use crate::client::{CatalogClient, CatalogError};

/// Upload types that are installable game content.
const INSTALLABLE_TYPES: [&str; 2] = ["", "default"];

/// Platform-independent upload type, playable anywhere.
const HTML_TYPE: &str = "html";

/// Operating system uploads are filtered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    Osx,
}

impl Platform {
    /// Platform of the running process.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Osx
        } else {
            Platform::Linux
        }
    }

    /// Parses a config value (`windows`, `linux`, `osx`/`macos`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "windows" => Some(Platform::Windows),
            "linux" => Some(Platform::Linux),
            "osx" | "macos" => Some(Platform::Osx),
            _ => None,
        }
    }

    fn supports(self, upload: &Upload) -> bool {
        if upload.upload_type == HTML_TYPE {
            return true;
        }
        match self {
            Platform::Windows => upload.platforms.windows,
            Platform::Linux => upload.platforms.linux,
            Platform::Osx => upload.platforms.osx,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Osx => "osx",
        };
        f.write_str(name)
    }
}

/// Outcome of filtering a game's uploads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadsFilterResult {
    /// Full, unfiltered listing, kept for diagnostics.
    pub initial_uploads: Vec<Upload>,
    /// Uploads installable on the target platform, best candidates first.
    pub uploads: Vec<Upload>,
}

/// Keeps the uploads that are installable on `platform`.
///
/// Drops non-game upload types, uploads for other platforms and preorders.
/// Demos are dropped whenever at least one full version is compatible.
pub fn filter_uploads(uploads: Vec<Upload>, platform: Platform) -> UploadsFilterResult {
    let compatible: Vec<Upload> = uploads
        .iter()
        .filter(|u| {
            INSTALLABLE_TYPES.contains(&u.upload_type.as_str()) || u.upload_type == HTML_TYPE
        })
        .filter(|u| platform.supports(u))
        .filter(|u| !u.preorder)
        .cloned()
        .collect();

    let has_full = compatible.iter().any(|u| !u.demo);
    let mut kept: Vec<Upload> = compatible
        .into_iter()
        .filter(|u| !(has_full && u.demo))
        .collect();

    // Native builds before browser builds; stable otherwise.
    kept.sort_by_key(|u| u.upload_type == HTML_TYPE);

    UploadsFilterResult {
        initial_uploads: uploads,
        uploads: kept,
    }
}

/// Lists a game's uploads from the catalog and filters them for `platform`.
pub async fn filtered_uploads(
    client: &dyn CatalogClient,
    game: &Game,
    access: &Access,
    platform: Platform,
) -> Result<UploadsFilterResult, CatalogError> {
    let uploads = client.list_game_uploads(access, game.id).await?;
    let result = filter_uploads(uploads, platform);
    info!(
        game = game.id,
        %platform,
        total = result.initial_uploads.len(),
        compatible = result.uploads.len(),
        "filtered uploads"
    );
    Ok(result)
}

/// Whether an upload is served outside the platform's delivery pipeline.
pub fn is_probably_external(upload: &Upload) -> bool {
    upload.storage == UploadStorage::External
}

/// Logs one diagnostic line describing an upload and its build.
pub fn log_upload(upload: &Upload, build: Option<&Build>) {
    let mut platforms = Vec::new();
    if upload.platforms.windows {
        platforms.push("windows");
    }
    if upload.platforms.linux {
        platforms.push("linux");
    }
    if upload.platforms.osx {
        platforms.push("osx");
    }

    match build {
        Some(b) => info!(
            upload = upload.id,
            name = upload.label(),
            storage = ?upload.storage,
            kind = %upload.upload_type,
            platforms = %platforms.join(","),
            build = b.id,
            version = %b.user_version,
            "upload"
        ),
        None => info!(
            upload = upload.id,
            name = upload.label(),
            storage = ?upload.storage,
            kind = %upload.upload_type,
            platforms = %platforms.join(","),
            "upload"
        ),
    }
}
