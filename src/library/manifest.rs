//! Catalog backed by a TOML export of the hosted song table.
//!
//! ```toml
//! [[tracks]]
//! id = "5f2c"
//! title = "Song"
//! artist = "Artist"
//! album = "Album"
//! duration = 215
//! cover_url = "https://cdn.example/covers/5f2c.jpg"
//! audio_url = "file:///srv/music/song.mp3"
//! created_at = "2024-03-01T12:00:00Z"
//! ```
//!
//! `created_at` must be a quoted RFC 3339 string.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::catalog::{Catalog, CatalogError, sort_newest_first};
use super::model::Track;

#[derive(Deserialize)]
struct Manifest {
    #[serde(default)]
    tracks: Vec<Track>,
}

pub struct ManifestCatalog {
    tracks: Vec<Track>,
}

impl ManifestCatalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        log::info!("Loading catalog manifest {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        let manifest: Manifest = toml::from_str(content)?;
        Self::from_tracks(manifest.tracks)
    }

    /// Build a catalog from already-parsed tracks. Ids must be unique.
    pub fn from_tracks(mut tracks: Vec<Track>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for t in &tracks {
            if !seen.insert(t.id.as_str()) {
                return Err(CatalogError::DuplicateId(t.id.clone()));
            }
        }

        sort_newest_first(&mut tracks);
        Ok(Self { tracks })
    }
}

impl Catalog for ManifestCatalog {
    fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}
