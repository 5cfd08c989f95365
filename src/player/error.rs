//! Error types for playback control

use thiserror::Error;

/// Errors returned by `Controller::execute`.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// The operation is part of the contract but has no behavior.
    #[error("{0} is not supported")]
    Unsupported(&'static str),

    /// The audio transport rejected a paired command.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Audio transport errors
#[derive(Debug, Error)]
pub enum TransportError {
    /// The track's audio reference cannot be played by this transport
    #[error("unsupported audio resource: {0}")]
    UnsupportedResource(String),

    /// The audio thread has exited
    #[error("audio thread is not running")]
    Disconnected,

    /// Opening or decoding the audio failed
    #[error("playback failed: {0}")]
    Playback(String),
}
