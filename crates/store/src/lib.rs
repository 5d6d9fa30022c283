//! Local persistent store: caves, install locations, profile credentials.
//!
//! Callers only see the [`Store`] trait. Every method is a short, scoped
//! access: no lock or handle outlives the call, so callers can freely
//! await between accesses.

mod json;

pub use json::{DownloadKey, JsonStore, Profile};

use burrow_models::{Access, Cave, InstallLocation};

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no profile is logged in")]
    NoProfile,
}

/// Read access to locally persisted install records.
pub trait Store: Send + Sync {
    /// Looks up a cave by id.
    fn cave_by_id(&self, id: &str) -> Result<Option<Cave>, StoreError>;

    /// Looks up an install location by id.
    fn install_location_by_id(&self, id: &str) -> Result<Option<InstallLocation>, StoreError>;

    /// Returns the credentials to use for catalog calls about a game.
    fn access_for_game(&self, game_id: i64) -> Result<Access, StoreError>;
}
