use std::time::Duration;

use crate::config::TrackDisplayField;

use super::model::Track;

/// Build a display string for `track` according to the provided `fields` and separator.
///
/// Blank fields are skipped. Falls back to the title when no parts were produced.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    let mut push = |value: &str| {
        let value = value.trim();
        if !value.is_empty() {
            parts.push(value.to_string());
        }
    };

    for f in fields {
        match f {
            TrackDisplayField::Display => {
                // "display" on its own means "artist - title".
                push(&track.artist);
                push(&track.title);
            }
            TrackDisplayField::Title => push(&track.title),
            TrackDisplayField::Artist => push(&track.artist),
            TrackDisplayField::Album => push(&track.album),
            TrackDisplayField::Id => push(&track.id),
            TrackDisplayField::Source => push(&track.audio_url),
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}

/// Format a position as `m:ss`. Minutes are not capped at 59.
pub fn format_time(time: Duration) -> String {
    let secs = time.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
