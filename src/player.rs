//! Playback core.
//!
//! `PlaybackState` owns the current track, the playing flag and the pending
//! queue. `Controller` is the only writer: it executes one `Command` at a
//! time and pairs each state transition with the matching `Transport` call.

mod command;
mod error;
mod state;
mod transport;

pub use command::{Command, Controller, Outcome, Progress};
pub use error::{PlayerError, TransportError};
pub use state::{PlaybackState, PlaybackStatus};
pub use transport::Transport;

#[cfg(test)]
pub(crate) mod fake;

#[cfg(test)]
mod tests;
