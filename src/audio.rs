//! Audio output: a `rodio`-backed `Transport`.
//!
//! Decoding and output run on a dedicated thread that owns the output stream.
//! `AudioPlayer` sends it `AudioCmd`s and reads progress back through a
//! shared `PlaybackInfo`.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
