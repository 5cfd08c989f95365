use std::collections::VecDeque;

use crate::library::Track;

use super::error::PlayerError;

/// Coarse status derived from `PlaybackState`, as reported to media keys.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Nothing loaded.
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// The current track, whether it is playing, and the tracks waiting after it.
///
/// Invariant: `playing` is only ever true while `current` is loaded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaybackState {
    current: Option<Track>,
    playing: bool,
    pending: VecDeque<Track>,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Upcoming tracks, head first.
    pub fn pending(&self) -> &VecDeque<Track> {
        &self.pending
    }

    pub fn status(&self) -> PlaybackStatus {
        match (&self.current, self.playing) {
            (None, _) => PlaybackStatus::Stopped,
            (Some(_), true) => PlaybackStatus::Playing,
            (Some(_), false) => PlaybackStatus::Paused,
        }
    }

    /// Load `track` and mark it playing. The queue is left alone.
    pub fn set_current(&mut self, track: Track) {
        self.current = Some(track);
        self.playing = true;
    }

    /// Flip the playing flag and return the new value.
    ///
    /// Does nothing (and returns `false`) when no track is loaded.
    pub fn toggle_play(&mut self) -> bool {
        if self.current.is_none() {
            return false;
        }
        self.playing = !self.playing;
        self.playing
    }

    /// Append to the tail of the queue. Duplicates are allowed.
    pub fn enqueue(&mut self, track: Track) {
        self.pending.push_back(track);
    }

    /// Remove the first queued track with this id, if any.
    pub fn dequeue_by_id(&mut self, id: &str) -> Option<Track> {
        let pos = self.pending.iter().position(|t| t.id == id)?;
        self.pending.remove(pos)
    }

    /// Pop the head of the queue into `current` and mark it playing.
    ///
    /// With an empty queue nothing changes and `None` is returned.
    pub fn advance(&mut self) -> Option<&Track> {
        let next = self.pending.pop_front()?;
        self.current = Some(next);
        self.playing = true;
        self.current.as_ref()
    }

    /// No history of played tracks is kept, so going back is not possible.
    pub fn play_previous(&self) -> Result<(), PlayerError> {
        Err(PlayerError::Unsupported("play previous"))
    }
}
