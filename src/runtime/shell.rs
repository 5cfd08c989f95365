//! Line-oriented command shell parsing.

use std::time::Duration;

pub const HELP: &str = "\
commands:
  list | ls              list the catalog, newest first
  artists                list the catalog grouped by artist
  search <q> | /<q>      fuzzy search by artist, title or album
  play <id>              play a track (toggles if it is already current)
  toggle | p | <enter>   play/pause
  queue <id> | add <id>  append a track to the queue
  dequeue <id> | rm <id> remove a track from the queue
  next | n               play the next queued track
  prev                   previous track (not supported)
  seek <m:ss|secs>       jump within the current track
  ff | rew               skip forward/back
  vol <0-100>            set the volume
  status | st            now playing and queue
  help | ?               this text
  quit | q               exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCmd {
    List,
    Artists,
    Search(String),
    Play(String),
    Toggle,
    Queue(String),
    Dequeue(String),
    Next,
    Prev,
    Seek(Duration),
    Forward,
    Rewind,
    Volume(u8),
    Status,
    Help,
    Quit,
}

/// Parse one input line. The error is a message meant for the user.
pub fn parse_line(line: &str) -> Result<ShellCmd, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ShellCmd::Toggle);
    }
    if let Some(query) = line.strip_prefix('/') {
        return Ok(ShellCmd::Search(query.trim().to_string()));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let id = |usage: &str| {
        if rest.is_empty() {
            Err(format!("usage: {usage} <id>"))
        } else {
            Ok(rest.to_string())
        }
    };

    match word.to_lowercase().as_str() {
        "list" | "ls" => Ok(ShellCmd::List),
        "artists" => Ok(ShellCmd::Artists),
        "search" => Ok(ShellCmd::Search(rest.to_string())),
        "play" => id("play").map(ShellCmd::Play),
        "toggle" | "p" => Ok(ShellCmd::Toggle),
        "queue" | "add" => id(word).map(ShellCmd::Queue),
        "dequeue" | "rm" => id(word).map(ShellCmd::Dequeue),
        "next" | "n" => Ok(ShellCmd::Next),
        "prev" => Ok(ShellCmd::Prev),
        "seek" => parse_time(rest).map(ShellCmd::Seek),
        "ff" => Ok(ShellCmd::Forward),
        "rew" => Ok(ShellCmd::Rewind),
        "vol" | "volume" => parse_volume(rest).map(ShellCmd::Volume),
        "status" | "st" => Ok(ShellCmd::Status),
        "help" | "?" => Ok(ShellCmd::Help),
        "quit" | "q" | "exit" => Ok(ShellCmd::Quit),
        other => Err(format!("unknown command: {other} (try `help`)")),
    }
}

/// Accepts `m:ss` or a plain number of seconds.
pub fn parse_time(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let invalid = || format!("invalid time: {input:?} (use m:ss or seconds)");

    let secs = match input.split_once(':') {
        Some((m, s)) => {
            let minutes: u64 = m.parse().map_err(|_| invalid())?;
            let seconds: u64 = s.parse().map_err(|_| invalid())?;
            if s.len() != 2 || seconds >= 60 {
                return Err(invalid());
            }
            minutes
                .checked_mul(60)
                .and_then(|m| m.checked_add(seconds))
                .ok_or_else(invalid)?
        }
        None => input.parse().map_err(|_| invalid())?,
    };
    Ok(Duration::from_secs(secs))
}

fn parse_volume(input: &str) -> Result<u8, String> {
    match input.trim().parse::<u8>() {
        Ok(v) if v <= 100 => Ok(v),
        _ => Err("usage: vol <0-100>".to_string()),
    }
}
