use std::env;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::audio::AudioPlayer;
use crate::error::App;
use crate::mpris::ControlCmd;
use crate::player::Controller;

mod event_loop;
mod mpris_sync;
mod settings;
mod shell;
mod startup;


use event_loop::{Context, EventLoopState, Input};

pub fn run() -> Result<(), App> {
    let (settings, config_warning) = settings::load_settings();
    if let Some(msg) = &config_warning {
        eprintln!("melodeck: {msg}");
    }

    let _logger = startup::start_logger(&settings.logging)?;
    if let Some(msg) = config_warning {
        warn!("{msg}");
    }
    info!("melodeck starting");

    let source = startup::resolve_source(env::args().nth(1), &settings.library)?;
    let catalog = startup::open_catalog(&source, &settings.library)?;
    println!(
        "{} tracks in {}. Type `help` for commands.",
        catalog.tracks().len(),
        source.display()
    );

    let mut controller = Controller::new(AudioPlayer::new());
    startup::apply_playback_defaults(&mut controller, &settings);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = settings
        .mpris
        .enabled
        .then(|| crate::mpris::spawn_mpris(control_tx));

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    spawn_stdin_reader(input_tx);

    let mut ctx = Context {
        settings: &settings,
        catalog: catalog.as_ref(),
        controller: &mut controller,
    };
    let mut state = EventLoopState::new();
    let run_result = event_loop::run(
        &mut ctx,
        &mut io::stdout(),
        mpris.as_ref(),
        &input_rx,
        &control_rx,
        &mut state,
    );

    controller
        .transport()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    info!("melodeck stopped");

    run_result?;
    Ok(())
}

fn spawn_stdin_reader(tx: Sender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Input::Line(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    warn!("Failed to read stdin: {e}");
                    break;
                }
            }
        }
        let _ = tx.send(Input::Closed);
    });
}
