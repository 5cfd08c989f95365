use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, error, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::sink::create_sink_at;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// Everything the audio thread knows about the loaded track.
struct Deck {
    sink: Option<Sink>,
    id: Option<String>,
    path: Option<PathBuf>,
    paused: bool,
    volume: f32,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Deck {
    fn new() -> Self {
        Self {
            sink: None,
            id: None,
            path: None,
            paused: true,
            volume: 1.0,
            started_at: None,
            accumulated: Duration::ZERO,
        }
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn clear(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.id = None;
        self.path = None;
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    /// Replace the sink with a fresh one positioned at `start_at`, keeping
    /// the paused/playing state.
    fn open_at(
        &mut self,
        stream: &OutputStream,
        start_at: Duration,
        info: &PlaybackHandle,
    ) -> bool {
        let Some(path) = self.path.clone() else {
            return false;
        };
        if let Some(s) = self.sink.take() {
            s.stop();
        }

        match create_sink_at(stream, &path, start_at, self.volume) {
            Ok((sink, total)) => {
                if self.paused {
                    self.started_at = None;
                } else {
                    sink.play();
                    self.started_at = Some(Instant::now());
                }
                self.sink = Some(sink);
                self.accumulated = start_at;
                if let Ok(mut i) = info.lock() {
                    i.elapsed = start_at;
                    if total.is_some() {
                        i.duration = total;
                    }
                }
                true
            }
            Err(e) => {
                error!("{e}");
                self.clear();
                if let Ok(mut i) = info.lock() {
                    i.error = Some(e.to_string());
                }
                false
            }
        }
    }

    fn pause(&mut self, info: &PlaybackHandle) {
        if self.paused {
            return;
        }
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        self.accumulated = self.elapsed();
        self.started_at = None;
        self.paused = true;
        if let Ok(mut i) = info.lock() {
            i.elapsed = self.accumulated;
        }
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

/// Drain commands without an output device so senders never block or fail.
fn run_without_device(rx: &Receiver<AudioCmd>, playback_info: &PlaybackHandle, reason: &str) {
    while let Ok(cmd) = rx.recv() {
        match cmd {
            AudioCmd::Quit { .. } => break,
            AudioCmd::Load { .. } | AudioCmd::Resume => {
                if let Ok(mut info) = playback_info.lock() {
                    info.error = Some(format!("no audio output: {reason}"));
                }
            }
            _ => {}
        }
    }
}

pub(super) fn spawn_audio_thread(rx: Receiver<AudioCmd>, playback_info: PlaybackHandle) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                error!("No audio output device: {e}");
                run_without_device(&rx, &playback_info, &e.to_string());
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped, which would land
        // in the middle of the command shell.
        stream.log_on_drop(false);

        let mut deck = Deck::new();

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { id, path } => {
                        debug!("Loading {id} from {}", path.display());
                        deck.clear();
                        if let Ok(mut info) = playback_info.lock() {
                            *info = PlaybackInfo {
                                loaded: Some(id.clone()),
                                ..PlaybackInfo::default()
                            };
                        }
                        deck.id = Some(id);
                        deck.path = Some(path);
                        deck.open_at(&stream, Duration::ZERO, &playback_info);
                    }

                    AudioCmd::Resume => {
                        if !deck.paused {
                            continue;
                        }
                        // A drained sink cannot resume; rebuild it from the start.
                        let drained = deck.sink.as_ref().is_none_or(Sink::empty);
                        if drained && !deck.open_at(&stream, Duration::ZERO, &playback_info) {
                            continue;
                        }
                        if let Some(s) = deck.sink.as_ref() {
                            s.play();
                            deck.paused = false;
                            deck.started_at = Some(Instant::now());
                            if let Ok(mut info) = playback_info.lock() {
                                info.finished = false;
                            }
                        }
                    }

                    AudioCmd::Pause => deck.pause(&playback_info),

                    AudioCmd::SeekTo(position) => {
                        // Scrubbing: rebuild the current sink and skip into the file.
                        // This uses `Source::skip_duration` (works for common formats).
                        if deck.sink.is_none() {
                            continue;
                        }
                        deck.open_at(&stream, position, &playback_info);
                    }

                    AudioCmd::SetVolume(volume) => {
                        deck.volume = volume.clamp(0.0, 1.0);
                        if let Some(s) = deck.sink.as_ref() {
                            s.set_volume(deck.volume);
                        }
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(ref s) = deck.sink {
                            if !deck.paused {
                                // Fade out gently before stopping.
                                fade_out_sink(s, deck.volume, fade_out_ms);
                            }
                            s.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    if deck.paused {
                        continue;
                    }
                    let ended = deck.sink.as_ref().is_some_and(Sink::empty);
                    if ended {
                        deck.pause(&playback_info);
                        // The controller may already have asked for another track.
                        if let Ok(mut info) = playback_info.lock() {
                            if info.loaded == deck.id {
                                info.finished = true;
                            }
                        }
                    } else if let Ok(mut info) = playback_info.lock() {
                        info.elapsed = deck.elapsed();
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("Audio command channel closed");
                    break;
                }
            }
        }
    })
}
