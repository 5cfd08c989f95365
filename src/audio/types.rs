//! Commands and shared state exchanged with the audio thread.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, PartialEq)]
pub enum AudioCmd {
    /// Open `path` for the track `id`, paused at the start.
    Load { id: String, path: PathBuf },
    /// Start or resume output. Replays from the start if the track had ended.
    Resume,
    Pause,
    /// Jump to an absolute position.
    SeekTo(Duration),
    /// Linear volume, 0.0 to 1.0.
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the controller.
pub struct PlaybackInfo {
    /// Id of the loaded track, if any.
    pub loaded: Option<String>,
    /// Elapsed playback time for the loaded track.
    pub elapsed: Duration,
    /// Total length reported by the decoder.
    pub duration: Option<Duration>,
    /// Set when the loaded track played to its end.
    pub finished: bool,
    /// Last open/decode failure.
    pub error: Option<String>,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
