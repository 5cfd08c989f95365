use std::time::Duration;

use log::{debug, warn};

use crate::library::Track;

use super::error::PlayerError;
use super::state::PlaybackState;
use super::transport::Transport;

/// A single user intent, executed as one unit by `Controller::execute`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Load and play a track, replacing the current one.
    Play(Track),
    /// Play a track, or toggle play/pause when it is already the current one.
    Select(Track),
    /// Toggle play/pause. No-op when nothing is loaded.
    TogglePlay,
    /// Append a track to the queue.
    Enqueue(Track),
    /// Remove the first queued track with this id.
    Dequeue(String),
    /// Play the head of the queue.
    Next,
    /// Go back to the previously played track. Unsupported.
    Previous,
    /// Jump to an absolute position in the current track.
    Seek(Duration),
    /// Jump by the given number of seconds (negative rewinds).
    SeekBy(i64),
    /// Set the output volume in percent; values above 100 are clamped.
    SetVolume(u8),
}

/// Whether executing a command changed the logical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub elapsed: Duration,
    pub duration: Duration,
}

/// Owns the playback state and the transport, and keeps them in step.
pub struct Controller<T: Transport> {
    state: PlaybackState,
    transport: T,
    volume: u8,
}

impl<T: Transport> Controller<T> {
    pub fn new(transport: T) -> Self {
        Self {
            state: PlaybackState::new(),
            transport,
            volume: 100,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Apply `cmd` to the state and issue the matching transport calls.
    ///
    /// State changes are never rolled back: when the transport fails the
    /// error is returned, but the state keeps the transition.
    pub fn execute(&mut self, cmd: Command) -> Result<Outcome, PlayerError> {
        let result = match cmd {
            Command::Play(track) => self.play(track),
            Command::Select(track) => {
                let is_current = self.state.current().is_some_and(|c| c.id == track.id);
                if is_current {
                    self.toggle()
                } else {
                    self.play(track)
                }
            }
            Command::TogglePlay => self.toggle(),
            Command::Enqueue(track) => {
                debug!("Queued {}", track.id);
                self.state.enqueue(track);
                Ok(Outcome::Changed)
            }
            Command::Dequeue(id) => match self.state.dequeue_by_id(&id) {
                Some(_) => {
                    debug!("Removed {id} from the queue");
                    Ok(Outcome::Changed)
                }
                None => Ok(Outcome::Unchanged),
            },
            Command::Next => self.next(),
            Command::Previous => self
                .state
                .play_previous()
                .map(|()| Outcome::Unchanged),
            Command::Seek(position) => self.seek(position),
            Command::SeekBy(secs) => {
                let current = i64::try_from(self.transport.elapsed().as_secs()).unwrap_or(i64::MAX);
                let target = current.saturating_add(secs).max(0).unsigned_abs();
                self.seek(Duration::from_secs(target))
            }
            Command::SetVolume(percent) => {
                let percent = percent.min(100);
                self.volume = percent;
                self.transport.set_volume(f32::from(percent) / 100.0)?;
                Ok(Outcome::Changed)
            }
        };

        if let Err(PlayerError::Transport(e)) = &result {
            warn!("Transport failed: {e}");
        }
        result
    }

    /// React to the transport reporting the end of the current track.
    ///
    /// Plays the next queued track when `auto_advance` is set; otherwise (or
    /// with an empty queue) the flag is paused so it matches the silent output.
    pub fn track_finished(&mut self, auto_advance: bool) -> Result<Outcome, PlayerError> {
        if auto_advance && !self.state.pending().is_empty() {
            return self.execute(Command::Next);
        }
        if self.state.is_playing() {
            return self.execute(Command::TogglePlay);
        }
        Ok(Outcome::Unchanged)
    }

    /// Elapsed and total time of the current track.
    ///
    /// The total comes from the transport once known, else from the catalog.
    pub fn progress(&self) -> Option<Progress> {
        let track = self.state.current()?;
        Some(Progress {
            elapsed: self.transport.elapsed(),
            duration: self.transport.duration().unwrap_or_else(|| track.length()),
        })
    }

    fn play(&mut self, track: Track) -> Result<Outcome, PlayerError> {
        debug!("Playing {}", track.id);
        self.state.set_current(track);
        self.start_current()?;
        Ok(Outcome::Changed)
    }

    fn next(&mut self) -> Result<Outcome, PlayerError> {
        match self.state.advance() {
            Some(track) => debug!("Advanced to {}", track.id),
            None => return Ok(Outcome::Unchanged),
        }
        self.start_current()?;
        Ok(Outcome::Changed)
    }

    fn toggle(&mut self) -> Result<Outcome, PlayerError> {
        if self.state.current().is_none() {
            return Ok(Outcome::Unchanged);
        }
        if self.state.toggle_play() {
            debug!("Resumed");
            self.transport.play()?;
        } else {
            debug!("Paused");
            self.transport.pause()?;
        }
        Ok(Outcome::Changed)
    }

    fn seek(&mut self, position: Duration) -> Result<Outcome, PlayerError> {
        let Some(progress) = self.progress() else {
            return Ok(Outcome::Unchanged);
        };
        let position = if progress.duration.is_zero() {
            position
        } else {
            position.min(progress.duration)
        };
        self.transport.seek(position)?;
        Ok(Outcome::Changed)
    }

    fn start_current(&mut self) -> Result<(), PlayerError> {
        if let Some(track) = self.state.current() {
            self.transport.load(track)?;
            self.transport.play()?;
        }
        Ok(())
    }
}
