//! JSON-file-backed store.
//!
//! Records are cached in memory and persisted to a single JSON document
//! on every write.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use burrow_models::{Access, Cave, GameCredentials, InstallLocation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Store, StoreError};

/// The logged-in profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub api_key: String,
}

/// Proof of ownership of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadKey {
    pub id: i64,
    pub game_id: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile: Option<Profile>,
    #[serde(default)]
    install_locations: Vec<InstallLocation>,
    #[serde(default)]
    caves: Vec<Cave>,
    #[serde(default)]
    download_keys: Vec<DownloadKey>,
}

/// Store persisted as one JSON document.
pub struct JsonStore {
    path: PathBuf,
    doc: RwLock<Document>,
}

impl JsonStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let doc = load_document(&path)?;
        Ok(Self {
            path,
            doc: RwLock::new(doc),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sets the logged-in profile.
    pub fn set_profile(&self, profile: Profile) -> Result<(), StoreError> {
        self.update(|doc| doc.profile = Some(profile))
    }

    /// Inserts or replaces an install location.
    pub fn save_install_location(&self, location: InstallLocation) -> Result<(), StoreError> {
        self.update(|doc| upsert(&mut doc.install_locations, location, |l| &l.id))
    }

    /// Inserts or replaces a cave.
    pub fn save_cave(&self, cave: Cave) -> Result<(), StoreError> {
        self.update(|doc| upsert(&mut doc.caves, cave, |c| &c.id))
    }

    /// Records a download key.
    pub fn save_download_key(&self, key: DownloadKey) -> Result<(), StoreError> {
        self.update(|doc| {
            doc.download_keys.retain(|k| k.id != key.id);
            doc.download_keys.push(key);
        })
    }

    /// Caves installed under a location.
    pub fn caves_in_location(&self, location_id: &str) -> Vec<Cave> {
        self.read(|doc| {
            doc.caves
                .iter()
                .filter(|c| c.install_location_id == location_id)
                .cloned()
                .collect()
        })
    }

    fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> T {
        let doc = self.doc.read().unwrap_or_else(PoisonError::into_inner);
        f(&doc)
    }

    fn update(&self, f: impl FnOnce(&mut Document)) -> Result<(), StoreError> {
        let mut doc = self.doc.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut doc);
        persist(&self.path, &doc)
    }
}

impl Store for JsonStore {
    fn cave_by_id(&self, id: &str) -> Result<Option<Cave>, StoreError> {
        Ok(self.read(|doc| doc.caves.iter().find(|c| c.id == id).cloned()))
    }

    fn install_location_by_id(&self, id: &str) -> Result<Option<InstallLocation>, StoreError> {
        Ok(self.read(|doc| doc.install_locations.iter().find(|l| l.id == id).cloned()))
    }

    fn access_for_game(&self, game_id: i64) -> Result<Access, StoreError> {
        self.read(|doc| {
            let profile = doc.profile.as_ref().ok_or(StoreError::NoProfile)?;
            let download_key_id = doc
                .download_keys
                .iter()
                .find(|k| k.game_id == game_id)
                .map(|k| k.id)
                .unwrap_or_default();
            Ok(Access {
                api_key: profile.api_key.clone(),
                credentials: GameCredentials { download_key_id },
            })
        })
    }
}

fn upsert<T>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> &String) {
    match items.iter().position(|existing| key(existing) == key(&item)) {
        Some(idx) => items[idx] = item,
        None => items.push(item),
    }
}

fn load_document(path: &Path) -> Result<Document, StoreError> {
    if !path.exists() {
        return Ok(Document::default());
    }
    let data = std::fs::read_to_string(path)?;
    let doc: Document = serde_json::from_str(&data)?;
    debug!(
        caves = doc.caves.len(),
        locations = doc.install_locations.len(),
        "loaded store from {:?}",
        path
    );
    Ok(doc)
}

/// Writes the document next to its destination, then renames it in place.
fn persist(path: &Path, doc: &Document) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(doc)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    debug!(caves = doc.caves.len(), "persisted store to {:?}", path);
    Ok(())
}
