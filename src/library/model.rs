use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A catalog entry describing a single playable audio item.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Track {
    /// Opaque identifier, unique within a catalog.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    /// Length in whole seconds as recorded by the catalog.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub cover_url: String,
    /// Where the audio lives: a `file://` URL, a plain path or a remote URL.
    pub audio_url: String,
    pub created_at: DateTime<Utc>,
}

impl Track {
    pub fn length(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration))
    }
}
