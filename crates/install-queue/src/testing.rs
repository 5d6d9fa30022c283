//! Shared test doubles for the install queue.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use burrow_catalog::{CatalogClient, CatalogError};
use burrow_models::{
    Access, Build, Cave, Game, InstallLocation, InstallQueueResult, Upload, UploadPlatforms,
    UploadStorage,
};
use burrow_store::{JsonStore, Profile};

use crate::context::{JOB_FILE, JobContext};
use crate::error::QueueError;
use crate::handoff::{DownloadQueue, InstallPreparer};
use crate::prompt::{Confirmation, ExternalUploadConfirmer, UploadChoice, UploadChooser};
use crate::types::ResolvedJob;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub fn game(id: i64, url: &str) -> Game {
    Game {
        id,
        title: format!("Game {id}"),
        url: url.into(),
        ..Game::default()
    }
}

pub fn build(id: i64) -> Build {
    Build {
        id,
        version: id,
        ..Build::default()
    }
}

/// A Linux-compatible hosted upload.
pub fn upload(id: i64, build: Option<Build>) -> Upload {
    Upload {
        id,
        filename: format!("upload-{id}.zip"),
        upload_type: "default".into(),
        platforms: UploadPlatforms {
            linux: true,
            ..UploadPlatforms::default()
        },
        storage: if build.is_some() {
            UploadStorage::Build
        } else {
            UploadStorage::Hosted
        },
        build,
        ..Upload::default()
    }
}

/// A Linux-compatible upload hosted on a third-party site.
pub fn external(id: i64) -> Upload {
    Upload {
        storage: UploadStorage::External,
        host: "drive.example.com".into(),
        ..upload(id, None)
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// JSON store in a tempdir with a profile and install location `L1`.
pub struct TestStore {
    _tmp: tempfile::TempDir,
    root: PathBuf,
    store: Arc<JsonStore>,
}

impl TestStore {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("games");
        std::fs::create_dir_all(&root).unwrap();

        let store = JsonStore::open(tmp.path().join("store.json")).unwrap();
        store
            .set_profile(Profile {
                id: 1,
                api_key: "test-key".into(),
            })
            .unwrap();
        store
            .save_install_location(InstallLocation {
                id: "L1".into(),
                path: root.to_string_lossy().into_owned(),
            })
            .unwrap();

        Self {
            _tmp: tmp,
            root,
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    pub fn shared(&self) -> Arc<JsonStore> {
        Arc::clone(&self.store)
    }

    pub fn location_path(&self) -> &Path {
        &self.root
    }

    pub fn add_cave(&self, cave: Cave) {
        self.store.save_cave(cave).unwrap();
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Catalog serving one game and a fixed upload listing.
pub struct MockCatalog {
    game: Option<Game>,
    uploads: Option<Vec<Upload>>,
    calls: Mutex<Vec<String>>,
}

impl MockCatalog {
    pub fn new(game: Game) -> Self {
        Self {
            game: Some(game),
            uploads: Some(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `get_game` always fails.
    pub fn failing_game() -> Self {
        Self {
            game: None,
            ..Self::new(Game::default())
        }
    }

    pub fn with_uploads(mut self, uploads: Vec<Upload>) -> Self {
        self.uploads = Some(uploads);
        self
    }

    /// `list_game_uploads` always fails.
    pub fn failing_uploads(mut self) -> Self {
        self.uploads = None;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CatalogClient for MockCatalog {
    fn get_game<'a>(
        &'a self,
        _access: &'a Access,
        game_id: i64,
    ) -> BoxFuture<'a, Result<Game, CatalogError>> {
        self.calls.lock().unwrap().push(format!("get_game:{game_id}"));
        let result = self
            .game
            .clone()
            .ok_or_else(|| CatalogError::Rejected("game lookup failed".into()));
        Box::pin(async move { result })
    }

    fn list_game_uploads<'a>(
        &'a self,
        _access: &'a Access,
        game_id: i64,
    ) -> BoxFuture<'a, Result<Vec<Upload>, CatalogError>> {
        self.calls.lock().unwrap().push(format!("list_uploads:{game_id}"));
        let result = self.uploads.clone().ok_or(CatalogError::Api {
            status: 503,
            body: "unavailable".into(),
        });
        Box::pin(async move { result })
    }
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

pub struct MockChooser {
    reply: UploadChoice,
    offered: Mutex<Vec<Vec<i64>>>,
}

impl MockChooser {
    pub fn picking(index: usize) -> Self {
        Self {
            reply: UploadChoice::Picked(index),
            offered: Mutex::new(Vec::new()),
        }
    }

    pub fn aborting() -> Self {
        Self {
            reply: UploadChoice::from_index(-1),
            offered: Mutex::new(Vec::new()),
        }
    }

    /// Upload ids of every candidate list shown.
    pub fn offered(&self) -> Vec<Vec<i64>> {
        self.offered.lock().unwrap().clone()
    }
}

impl UploadChooser for MockChooser {
    fn pick_upload<'a>(
        &'a self,
        uploads: &'a [Upload],
    ) -> BoxFuture<'a, Result<UploadChoice, QueueError>> {
        self.offered
            .lock()
            .unwrap()
            .push(uploads.iter().map(|u| u.id).collect());
        let reply = self.reply;
        Box::pin(async move { Ok(reply) })
    }
}

pub struct MockConfirmer {
    reply: Confirmation,
    asked: Mutex<Vec<i64>>,
}

impl MockConfirmer {
    pub fn accepting() -> Self {
        Self {
            reply: Confirmation::Accept,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn declining() -> Self {
        Self {
            reply: Confirmation::Decline,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<i64> {
        self.asked.lock().unwrap().clone()
    }
}

impl ExternalUploadConfirmer for MockConfirmer {
    fn confirm_external_upload<'a>(
        &'a self,
        upload: &'a Upload,
    ) -> BoxFuture<'a, Result<Confirmation, QueueError>> {
        self.asked.lock().unwrap().push(upload.id);
        let reply = self.reply;
        Box::pin(async move { Ok(reply) })
    }
}

// ---------------------------------------------------------------------------
// Downstream engines
// ---------------------------------------------------------------------------

/// What the preparer saw when it was called.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareCall {
    pub job_id: String,
    pub allow_downloads: bool,
    /// Whether `job.json` was already on disk.
    pub job_saved: bool,
}

#[derive(Default)]
pub struct MockPreparer {
    pub fail: bool,
    calls: Mutex<Vec<PrepareCall>>,
}

impl MockPreparer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<PrepareCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl InstallPreparer for MockPreparer {
    fn prepare<'a>(
        &'a self,
        ctx: &'a JobContext,
        job: &'a ResolvedJob,
        allow_downloads: bool,
    ) -> BoxFuture<'a, Result<(), QueueError>> {
        self.calls.lock().unwrap().push(PrepareCall {
            job_id: job.id.clone(),
            allow_downloads,
            job_saved: ctx.staging_folder().join(JOB_FILE).exists(),
        });
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                Err(QueueError::Prepare("disk full".into()))
            } else {
                Ok(())
            }
        })
    }
}

#[derive(Default)]
pub struct MockDownloads {
    pub fail: bool,
    items: Mutex<Vec<InstallQueueResult>>,
}

impl MockDownloads {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn items(&self) -> Vec<InstallQueueResult> {
        self.items.lock().unwrap().clone()
    }
}

impl DownloadQueue for MockDownloads {
    fn enqueue<'a>(
        &'a self,
        item: &'a InstallQueueResult,
    ) -> BoxFuture<'a, Result<(), QueueError>> {
        let fail = self.fail;
        if !fail {
            self.items.lock().unwrap().push(item.clone());
        }
        Box::pin(async move {
            if fail {
                Err(QueueError::Enqueue("queue is closed".into()))
            } else {
                Ok(())
            }
        })
    }
}
