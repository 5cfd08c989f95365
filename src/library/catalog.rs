use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use super::model::Track;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate track id in catalog: {0}")]
    DuplicateId(String),

    #[error("catalog source does not exist: {0}")]
    Missing(PathBuf),
}

/// Read-only access to an ordered list of tracks.
///
/// Implementors only provide `tracks`; lookups, search and grouping are
/// derived from it.
pub trait Catalog {
    /// All tracks, newest first.
    fn tracks(&self) -> &[Track];

    fn get(&self, id: &str) -> Option<&Track> {
        self.tracks().iter().find(|t| t.id == id)
    }

    fn is_empty(&self) -> bool {
        self.tracks().is_empty()
    }

    /// Fuzzy search over "artist title" and album, keeping catalog order.
    ///
    /// Query characters must appear in order but not necessarily contiguously.
    /// A blank query matches everything.
    fn search(&self, query: &str) -> Vec<&Track> {
        let query = query.trim().to_lowercase();
        self.tracks()
            .iter()
            .filter(|t| {
                let label = format!("{} {}", t.artist, t.title).to_lowercase();
                is_subsequence(&label, &query) || is_subsequence(&t.album.to_lowercase(), &query)
            })
            .collect()
    }

    /// Tracks keyed by artist name, each group in catalog order.
    fn group_by_artist(&self) -> BTreeMap<&str, Vec<&Track>> {
        let mut groups: BTreeMap<&str, Vec<&Track>> = BTreeMap::new();
        for t in self.tracks() {
            groups.entry(t.artist.as_str()).or_default().push(t);
        }
        groups
    }
}

fn is_subsequence(haystack: &str, needle: &str) -> bool {
    let mut chars = haystack.chars();
    needle.chars().all(|nc| chars.any(|hc| hc == nc))
}

/// Sort newest first; ties keep a stable, case-insensitive artist/title order.
pub(super) fn sort_newest_first(tracks: &mut [Track]) {
    tracks.sort_by(|a, b| {
        b.created_at.cmp(&a.created_at).then_with(|| {
            let la = format!("{} {}", a.artist, a.title).to_lowercase();
            let lb = format!("{} {}", b.artist, b.title).to_lowercase();
            la.cmp(&lb)
        })
    });
}
