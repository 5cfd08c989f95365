//! A `Transport` that records every call, for pairing tests.

use std::time::Duration;

use crate::library::Track;

use super::error::TransportError;
use super::transport::Transport;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Load(String),
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingTransport {
    pub calls: Vec<Call>,
    pub elapsed: Duration,
    pub duration: Option<Duration>,
    pub finished: bool,
    pub error: Option<String>,
    /// Audio references containing this substring fail to load.
    pub reject: Option<String>,
}

impl RecordingTransport {
    pub(crate) fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl Transport for RecordingTransport {
    fn load(&mut self, track: &Track) -> Result<(), TransportError> {
        self.calls.push(Call::Load(track.id.clone()));
        if self
            .reject
            .as_deref()
            .is_some_and(|r| track.audio_url.contains(r))
        {
            return Err(TransportError::UnsupportedResource(track.audio_url.clone()));
        }
        self.elapsed = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self) -> Result<(), TransportError> {
        self.calls.push(Call::Play);
        Ok(())
    }

    fn pause(&mut self) -> Result<(), TransportError> {
        self.calls.push(Call::Pause);
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<(), TransportError> {
        self.calls.push(Call::Seek(position));
        self.elapsed = position;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), TransportError> {
        self.calls.push(Call::SetVolume(volume));
        Ok(())
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn take_finished(&mut self) -> bool {
        std::mem::take(&mut self.finished)
    }

    fn take_error(&mut self) -> Option<TransportError> {
        self.error.take().map(TransportError::Playback)
    }
}
