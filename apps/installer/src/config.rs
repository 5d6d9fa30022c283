//! Installer configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux/macOS: `$XDG_CONFIG_HOME/burrow/burrow.toml` (`~/.config/burrow/burrow.toml`)
//! - Windows: `%APPDATA%/burrow/burrow.toml`

use std::path::{Path, PathBuf};

use anyhow::Context;
use burrow_catalog::Platform;
use serde::{Deserialize, Serialize};

/// Installer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// JSON file holding the profile, install locations and caves.
    #[serde(default = "default_store_path")]
    pub store_path: String,

    /// Catalog API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// JSON file the download queue is appended to.
    #[serde(default = "default_queue_path")]
    pub queue_path: String,

    /// Platform uploads are filtered for (`windows`, `linux`, `osx`).
    /// Defaults to the running platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

fn default_store_path() -> String {
    config_dir().join("store.json").to_string_lossy().into_owned()
}

fn default_api_base_url() -> String {
    "https://api.itch.io".into()
}

fn default_queue_path() -> String {
    config_dir().join("queue.json").to_string_lossy().into_owned()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            api_base_url: default_api_base_url(),
            queue_path: default_queue_path(),
            platform: None,
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path())
    }

    /// Loads configuration from `path`, writing defaults there if missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("invalid configuration in {}", path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // Restrict permissions on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Platform to filter uploads for.
    pub fn platform(&self) -> anyhow::Result<Platform> {
        match self.platform.as_deref() {
            None | Some("") => Ok(Platform::current()),
            Some(name) => {
                Platform::parse(name).with_context(|| format!("unknown platform {name:?}"))
            }
        }
    }

    pub fn store_path(&self) -> PathBuf {
        expand_home(&self.store_path)
    }

    pub fn queue_path(&self) -> PathBuf {
        expand_home(&self.queue_path)
    }
}

/// Returns the platform-specific configuration directory.
fn config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("burrow")
    }

    #[cfg(not(target_os = "windows"))]
    {
        match std::env::var("XDG_CONFIG_HOME") {
            Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("burrow"),
            _ => home_dir().join(".config").join("burrow"),
        }
    }
}

/// Returns the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("burrow.toml")
}

fn home_dir() -> PathBuf {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    std::env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir())
}

/// Expands `~` prefix to the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else if path == "~" {
        home_dir()
    } else {
        PathBuf::from(path)
    }
}
