use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::catalog::{Catalog, CatalogError, sort_newest_first};
use super::model::Track;

/// Catalog built by scanning a local music directory.
///
/// Track ids are paths relative to the scanned root (always `/`-separated),
/// and `created_at` is the file's modification time.
pub struct DirectoryCatalog {
    tracks: Vec<Track>,
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn non_blank(v: Option<impl AsRef<str>>) -> Option<String> {
    v.map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Ids and `file://` URLs are strings, so a path that is not valid UTF-8 has
/// no faithful track and is skipped.
fn read_track(root: &Path, path: &Path) -> Option<Track> {
    let Some(full) = path.to_str() else {
        log::warn!("Skipping non UTF-8 path {}", path.display());
        return None;
    };
    let id = path
        .strip_prefix(root)
        .ok()
        .and_then(Path::to_str)
        .unwrap_or(full)
        .replace('\\', "/");

    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist = String::new();
    let mut album = String::new();
    let mut duration = 0u32;

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            duration = u32::try_from(tagged.properties().duration().as_secs()).unwrap_or(u32::MAX);

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = non_blank(tag.title()) {
                    title = v;
                }
                if let Some(v) = non_blank(tag.artist()) {
                    artist = v;
                }
                if let Some(v) = non_blank(tag.album()) {
                    album = v;
                }
            }
        }
        Err(e) => log::debug!("No readable tags in {}: {e}", path.display()),
    }

    let modified = path
        .metadata()
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH);

    Some(Track {
        id,
        title,
        artist,
        album,
        duration,
        cover_url: String::new(),
        audio_url: format!("file://{full}"),
        created_at: DateTime::<Utc>::from(modified),
    })
}

impl DirectoryCatalog {
    pub fn scan(dir: &Path, settings: &LibrarySettings) -> Result<Self, CatalogError> {
        if !dir.is_dir() {
            return Err(CatalogError::Missing(dir.to_path_buf()));
        }
        log::info!("Scanning {}", dir.display());

        let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

        // Non-recursive = only the root directory.
        let depth_cap = if settings.recursive {
            settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        let mut tracks: Vec<Track> = Vec::new();
        for entry in walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if path.is_file() && is_audio_file(path, settings) {
                tracks.extend(read_track(dir, path));
            }
        }

        sort_newest_first(&mut tracks);
        log::info!("Found {} tracks under {}", tracks.len(), dir.display());
        Ok(Self { tracks })
    }
}

impl Catalog for DirectoryCatalog {
    fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}
