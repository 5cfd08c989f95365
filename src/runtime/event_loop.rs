use std::io::{self, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use log::{debug, info, warn};

use crate::config::Settings;
use crate::library::{Catalog, Track, display_from_fields, format_time};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{
    Command, Controller, Outcome, PlaybackStatus, PlayerError, Transport, TransportError,
};
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::shell::{self, HELP, ShellCmd};

/// What the stdin reader thread hands to the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything a command needs: settings, the catalog and the controller.
pub struct Context<'a, T: Transport> {
    pub settings: &'a Settings,
    pub catalog: &'a dyn Catalog,
    pub controller: &'a mut Controller<T>,
}

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Last-known (track id, status) as emitted to MPRIS.
    last_mpris: Option<(Option<String>, PlaybackStatus)>,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Main loop: reacts to shell lines, MPRIS requests and transport events.
/// Returns when the user quits or stdin is closed.
pub fn run<T: Transport, W: Write>(
    ctx: &mut Context<'_, T>,
    out: &mut W,
    mpris: Option<&MprisHandle>,
    input_rx: &Receiver<Input>,
    control_rx: &Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> io::Result<()> {
    loop {
        poll_transport(ctx, out)?;

        if let Some(mpris) = mpris {
            sync_mpris(mpris, ctx.controller, state);
        }

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, ctx, out)? == Flow::Quit {
                return Ok(());
            }
        }

        match input_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(Input::Line(line)) => {
                if handle_line(&line, ctx, out)? == Flow::Quit {
                    return Ok(());
                }
            }
            Ok(Input::Closed) | Err(RecvTimeoutError::Disconnected) => {
                info!("Input closed, shutting down");
                return Ok(());
            }
            Err(RecvTimeoutError::Timeout) => {}
        }
    }
}

/// Keep MPRIS in sync even when playback changes come from media keys or
/// auto-advance.
fn sync_mpris<T: Transport>(
    mpris: &MprisHandle,
    controller: &Controller<T>,
    state: &mut EventLoopState,
) {
    let snapshot = (
        controller.state().current().map(|t| t.id.clone()),
        controller.state().status(),
    );
    if state.last_mpris.as_ref() != Some(&snapshot) {
        update_mpris(mpris, controller.state());
        state.last_mpris = Some(snapshot);
    }
}

/// Pick up errors and end-of-track from the transport.
pub fn poll_transport<T: Transport, W: Write>(
    ctx: &mut Context<'_, T>,
    out: &mut W,
) -> io::Result<()> {
    let auto_advance = ctx.settings.playback.auto_advance;

    let failed = match ctx.controller.transport_mut().take_error() {
        Some(err) => {
            warn!("Playback failed: {err}");
            writeln!(out, "{err}")?;
            true
        }
        None => false,
    };
    let finished = ctx.controller.transport_mut().take_finished();
    if !failed && !finished {
        return Ok(());
    }

    let before = current_id(ctx.controller);
    let result = ctx.controller.track_finished(auto_advance);
    if report(ctx, out, result)? && current_id(ctx.controller) != before {
        print_now_playing(ctx, out)?;
    }
    Ok(())
}

pub fn handle_line<T: Transport, W: Write>(
    line: &str,
    ctx: &mut Context<'_, T>,
    out: &mut W,
) -> io::Result<Flow> {
    match shell::parse_line(line) {
        Ok(cmd) => handle_shell_cmd(cmd, ctx, out),
        Err(msg) => {
            writeln!(out, "{msg}")?;
            Ok(Flow::Continue)
        }
    }
}

pub fn handle_shell_cmd<T: Transport, W: Write>(
    cmd: ShellCmd,
    ctx: &mut Context<'_, T>,
    out: &mut W,
) -> io::Result<Flow> {
    debug!("Shell command: {cmd:?}");
    match cmd {
        ShellCmd::List => {
            if ctx.catalog.is_empty() {
                writeln!(out, "catalog is empty")?;
            }
            for track in ctx.catalog.tracks() {
                writeln!(out, "{}", track_line(ctx.settings, track))?;
            }
        }
        ShellCmd::Artists => {
            for (artist, tracks) in ctx.catalog.group_by_artist() {
                let artist = if artist.is_empty() { "(unknown artist)" } else { artist };
                writeln!(out, "{artist}")?;
                for track in tracks {
                    writeln!(out, "  {}", track_line(ctx.settings, track))?;
                }
            }
        }
        ShellCmd::Search(query) => {
            let hits = ctx.catalog.search(&query);
            if hits.is_empty() {
                writeln!(out, "no matches for {query:?}")?;
            }
            for track in hits {
                writeln!(out, "{}", track_line(ctx.settings, track))?;
            }
        }
        ShellCmd::Play(id) => {
            let Some(track) = lookup(ctx, out, &id)? else {
                return Ok(Flow::Continue);
            };
            let result = ctx.controller.execute(Command::Select(track));
            if report(ctx, out, result)? {
                print_now_playing(ctx, out)?;
            }
        }
        ShellCmd::Toggle => {
            let result = ctx.controller.execute(Command::TogglePlay);
            if ctx.controller.state().current().is_none() {
                writeln!(out, "nothing loaded")?;
            } else if report(ctx, out, result)? {
                print_now_playing(ctx, out)?;
            }
        }
        ShellCmd::Queue(id) => {
            let Some(track) = lookup(ctx, out, &id)? else {
                return Ok(Flow::Continue);
            };
            let label = display(ctx.settings, &track);
            let result = ctx.controller.execute(Command::Enqueue(track));
            if report(ctx, out, result)? {
                let n = ctx.controller.state().pending().len();
                writeln!(out, "queued: {label} ({n} in queue)")?;
            }
        }
        ShellCmd::Dequeue(id) => {
            let result = ctx.controller.execute(Command::Dequeue(id.clone()));
            match result {
                Ok(Outcome::Changed) => writeln!(out, "removed {id} from the queue")?,
                Ok(Outcome::Unchanged) => writeln!(out, "not in queue: {id}")?,
                Err(e) => {
                    report(ctx, out, Err(e))?;
                }
            }
        }
        ShellCmd::Next => {
            let result = ctx.controller.execute(Command::Next);
            match result {
                Ok(Outcome::Unchanged) => writeln!(out, "queue is empty")?,
                other => {
                    if report(ctx, out, other)? {
                        print_now_playing(ctx, out)?;
                    }
                }
            }
        }
        ShellCmd::Prev => {
            let result = ctx.controller.execute(Command::Previous);
            report(ctx, out, result)?;
        }
        ShellCmd::Seek(position) => seek(ctx, out, Command::Seek(position))?,
        ShellCmd::Forward => seek(ctx, out, Command::SeekBy(seek_step(ctx.settings)))?,
        ShellCmd::Rewind => seek(ctx, out, Command::SeekBy(-seek_step(ctx.settings)))?,
        ShellCmd::Volume(percent) => {
            let result = ctx.controller.execute(Command::SetVolume(percent));
            if report(ctx, out, result)? {
                writeln!(out, "volume {}%", ctx.controller.volume())?;
            }
        }
        ShellCmd::Status => print_status(ctx, out)?,
        ShellCmd::Help => writeln!(out, "{HELP}")?,
        ShellCmd::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Media-key requests. The core has no stopped state, so `Stop` pauses.
pub fn handle_control_cmd<T: Transport, W: Write>(
    cmd: ControlCmd,
    ctx: &mut Context<'_, T>,
    out: &mut W,
) -> io::Result<Flow> {
    debug!("MPRIS command: {cmd:?}");
    let status = ctx.controller.state().status();
    let command = match cmd {
        ControlCmd::Quit => return Ok(Flow::Quit),
        ControlCmd::Play => match status {
            PlaybackStatus::Paused => Some(Command::TogglePlay),
            PlaybackStatus::Stopped => Some(Command::Next),
            PlaybackStatus::Playing => None,
        },
        ControlCmd::Pause | ControlCmd::Stop => {
            (status == PlaybackStatus::Playing).then_some(Command::TogglePlay)
        }
        ControlCmd::PlayPause => match status {
            PlaybackStatus::Stopped => Some(Command::Next),
            _ => Some(Command::TogglePlay),
        },
        ControlCmd::Next => Some(Command::Next),
        ControlCmd::Prev => Some(Command::Previous),
    };

    if let Some(command) = command {
        let before = current_id(ctx.controller);
        let result = ctx.controller.execute(command);
        if report(ctx, out, result)? && current_id(ctx.controller) != before {
            print_now_playing(ctx, out)?;
        }
    }
    Ok(Flow::Continue)
}

fn seek<T: Transport, W: Write>(
    ctx: &mut Context<'_, T>,
    out: &mut W,
    command: Command,
) -> io::Result<()> {
    let result = ctx.controller.execute(command);
    match result {
        Ok(Outcome::Unchanged) => writeln!(out, "nothing loaded"),
        other => {
            if report(ctx, out, other)? {
                print_progress(ctx, out)?;
            }
            Ok(())
        }
    }
}

/// Print a notification for a failed command. Returns whether it succeeded.
///
/// When a track could not be started the player moves on the same way it
/// does when a track ends, and reports where it landed. A disconnected audio
/// thread leaves the state alone.
fn report<T: Transport, W: Write>(
    ctx: &mut Context<'_, T>,
    out: &mut W,
    result: Result<Outcome, PlayerError>,
) -> io::Result<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(e @ PlayerError::Unsupported(_)) => {
            info!("{e}");
            writeln!(out, "{e}")?;
            Ok(false)
        }
        Err(e @ PlayerError::Transport(TransportError::Disconnected)) => {
            writeln!(out, "playback error: {e}")?;
            Ok(false)
        }
        Err(e @ PlayerError::Transport(_)) => {
            writeln!(out, "playback error: {e}")?;
            skip_unplayable(ctx, out)?;
            print_now_playing(ctx, out)?;
            Ok(false)
        }
    }
}

/// The playing flag may be up over silent output after a failed transport
/// call. Advance past every track that fails to start, or drop the flag.
///
/// Each round either pops the queue or clears the flag, so this terminates.
fn skip_unplayable<T: Transport, W: Write>(
    ctx: &mut Context<'_, T>,
    out: &mut W,
) -> io::Result<()> {
    let auto_advance = ctx.settings.playback.auto_advance;
    while ctx.controller.state().is_playing() {
        match ctx.controller.track_finished(auto_advance) {
            Err(e @ PlayerError::Transport(TransportError::Disconnected)) => {
                writeln!(out, "playback error: {e}")?;
                break;
            }
            Err(e @ PlayerError::Transport(_)) => writeln!(out, "playback error: {e}")?,
            _ => break,
        }
    }
    Ok(())
}

fn seek_step(settings: &Settings) -> i64 {
    i64::try_from(settings.controls.seek_seconds).unwrap_or(i64::MAX)
}

fn lookup<T: Transport, W: Write>(
    ctx: &Context<'_, T>,
    out: &mut W,
    id: &str,
) -> io::Result<Option<Track>> {
    match ctx.catalog.get(id) {
        Some(track) => Ok(Some(track.clone())),
        None => {
            writeln!(out, "unknown track: {id}")?;
            Ok(None)
        }
    }
}

fn current_id<T: Transport>(controller: &Controller<T>) -> Option<String> {
    controller.state().current().map(|t| t.id.clone())
}

fn display(settings: &Settings, track: &Track) -> String {
    display_from_fields(
        track,
        &settings.library.display_fields,
        &settings.library.display_separator,
    )
}

fn track_line(settings: &Settings, track: &Track) -> String {
    format!(
        "{}  {}  [{}]",
        track.id,
        display(settings, track),
        format_time(track.length())
    )
}

fn print_now_playing<T: Transport, W: Write>(ctx: &Context<'_, T>, out: &mut W) -> io::Result<()> {
    let state = ctx.controller.state();
    match (state.current(), state.status()) {
        (Some(track), PlaybackStatus::Playing) => {
            writeln!(out, "playing: {}", display(ctx.settings, track))
        }
        (Some(track), _) => writeln!(out, "paused: {}", display(ctx.settings, track)),
        (None, _) => writeln!(out, "nothing loaded"),
    }
}

fn print_progress<T: Transport, W: Write>(ctx: &Context<'_, T>, out: &mut W) -> io::Result<()> {
    if let Some(p) = ctx.controller.progress() {
        writeln!(out, "{} / {}", format_time(p.elapsed), format_time(p.duration))?;
    }
    Ok(())
}

fn print_status<T: Transport, W: Write>(ctx: &Context<'_, T>, out: &mut W) -> io::Result<()> {
    print_now_playing(ctx, out)?;
    print_progress(ctx, out)?;
    writeln!(out, "volume {}%", ctx.controller.volume())?;

    let pending = ctx.controller.state().pending();
    if pending.is_empty() {
        return writeln!(out, "queue is empty");
    }
    writeln!(out, "queue ({}):", pending.len())?;
    for (i, track) in pending.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, track_line(ctx.settings, track))?;
    }
    Ok(())
}
