//! Domain and wire types shared by the burrow install pipeline.
//!
//! - [`catalog`]: metadata served by the remote catalog (games, uploads, builds)
//! - [`local`]: records owned by the local store (caves, install locations, access)
//! - [`messages`]: install queue request/response payloads

pub mod catalog;
pub mod local;
pub mod messages;

pub use catalog::{Build, Game, Upload, UploadPlatforms, UploadStorage};
pub use local::{Access, Cave, GameCredentials, InstallLocation};
pub use messages::{DownloadReason, InstallQueueResult, InstallRequest};
