//! Install folder naming.

use burrow_models::{Cave, Game, InstallLocation};
use tracing::{debug, warn};
use url::Url;

use crate::fatal;

/// Suffixed candidates tried before giving up (`"<base> 2"` ... `"<base> 200"`).
pub const MAX_UNIQUE_TRIES: usize = 200;

/// Derives a folder name for a game: its URL slug, or `game-<id>`.
///
/// Never fails and never returns an empty string.
pub fn make_folder_name(game: &Game) -> String {
    slug_from_url(&game.url).unwrap_or_else(|| format!("game-{}", game.id))
}

/// First path segment of a game URL (`https://studio.example.io/overland` → `overland`).
pub fn slug_from_url(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            warn!(url = raw, error = %e, "could not parse game URL");
            return None;
        }
    };

    url.path_segments()?
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Makes `cave.install_folder_name` name a folder that does not exist yet.
///
/// The name is kept if free, otherwise `"<base> 2"`, `"<base> 3"`, ... are
/// tried. If every candidate is taken the base name is restored and the
/// call is aborted through [`fatal::raise`].
pub fn ensure_unique_folder_name(cave: &mut Cave, location: &InstallLocation) {
    let base = cave.install_folder_name.clone();
    let mut suffix = 2;

    for _ in 0..MAX_UNIQUE_TRIES {
        let folder = cave.install_folder(location);
        if std::fs::metadata(&folder).is_err() {
            return;
        }

        debug!(folder = %folder.display(), "install folder already exists");
        cave.install_folder_name = format!("{base} {suffix}");
        suffix += 1;
    }

    cave.install_folder_name = base;
    fatal::raise(format!(
        "could not ensure unique install folder starting with ({})",
        cave.install_folder(location).display()
    ));
}
