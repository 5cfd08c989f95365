use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::library::Track;
use crate::player::{Transport, TransportError};

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(rx, playback_info.clone());

        Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    /// A player with no audio thread; the receiving end is handed back.
    #[cfg(test)]
    pub(super) fn detached() -> (Self, mpsc::Receiver<AudioCmd>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let player = Self {
            tx,
            playback: Arc::new(Mutex::new(PlaybackInfo::default())),
            join: Mutex::new(None),
        };
        (player, rx)
    }

    #[cfg(test)]
    pub(super) fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), TransportError> {
        self.tx.send(cmd).map_err(|_| TransportError::Disconnected)
    }

    fn with_info<R>(&self, f: impl FnOnce(&mut PlaybackInfo) -> R) -> Option<R> {
        self.playback.lock().ok().map(|mut info| f(&mut info))
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let fade_out_ms = u64::try_from(fade_out.as_millis()).unwrap_or(u64::MAX);
        let _ = self.send(AudioCmd::Quit { fade_out_ms });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

/// Map an audio reference to a local file.
///
/// `file://` URLs and bare paths are accepted; any other scheme is not
/// something this player can open.
pub(super) fn resolve_audio_path(audio_url: &str) -> Result<PathBuf, TransportError> {
    let reference = audio_url.trim();
    if let Some(path) = reference.strip_prefix("file://") {
        return Ok(PathBuf::from(path));
    }
    if reference.is_empty() || reference.contains("://") {
        return Err(TransportError::UnsupportedResource(audio_url.to_string()));
    }
    Ok(PathBuf::from(reference))
}

impl Transport for AudioPlayer {
    fn load(&mut self, track: &Track) -> Result<(), TransportError> {
        let path = resolve_audio_path(&track.audio_url)?;
        // Reset before the thread picks the command up, so a stale `finished`
        // from the previous track is never observed.
        self.with_info(|info| {
            *info = PlaybackInfo {
                loaded: Some(track.id.clone()),
                ..PlaybackInfo::default()
            };
        });
        self.send(AudioCmd::Load {
            id: track.id.clone(),
            path,
        })
    }

    fn play(&mut self) -> Result<(), TransportError> {
        self.send(AudioCmd::Resume)
    }

    fn pause(&mut self) -> Result<(), TransportError> {
        self.send(AudioCmd::Pause)
    }

    fn seek(&mut self, position: Duration) -> Result<(), TransportError> {
        self.send(AudioCmd::SeekTo(position))
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), TransportError> {
        self.send(AudioCmd::SetVolume(volume))
    }

    fn elapsed(&self) -> Duration {
        self.with_info(|info| info.elapsed).unwrap_or_default()
    }

    fn duration(&self) -> Option<Duration> {
        self.with_info(|info| info.duration).flatten()
    }

    fn take_finished(&mut self) -> bool {
        self.with_info(|info| std::mem::take(&mut info.finished))
            .unwrap_or(false)
    }

    fn take_error(&mut self) -> Option<TransportError> {
        self.with_info(|info| info.error.take())
            .flatten()
            .map(TransportError::Playback)
    }
}
