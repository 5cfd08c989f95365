use std::time::Duration;

use crate::library::Track;

use super::error::TransportError;

/// The audio-rendering side of playback.
///
/// A transport loads one track at a time and obeys imperative commands. It
/// never decides what plays next; `Controller` does.
pub trait Transport {
    /// Prepare `track` for playback, paused at its start.
    fn load(&mut self, track: &Track) -> Result<(), TransportError>;

    fn play(&mut self) -> Result<(), TransportError>;

    fn pause(&mut self) -> Result<(), TransportError>;

    fn seek(&mut self, position: Duration) -> Result<(), TransportError>;

    /// `volume` is linear, 0.0 to 1.0.
    fn set_volume(&mut self, volume: f32) -> Result<(), TransportError>;

    fn elapsed(&self) -> Duration;

    /// Length of the loaded audio, once known.
    fn duration(&self) -> Option<Duration>;

    /// True once per loaded track, after it played to the end.
    fn take_finished(&mut self) -> bool;

    /// Last asynchronous failure (e.g. a file that would not decode), if any.
    fn take_error(&mut self) -> Option<TransportError>;
}
