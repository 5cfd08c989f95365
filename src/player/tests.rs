use super::fake::{Call, RecordingTransport};
use super::*;
use crate::library::Track;
use chrono::{TimeZone, Utc};
use std::time::Duration;

fn t(id: &str) -> Track {
    Track {
        id: id.into(),
        title: format!("Title {id}"),
        artist: "Artist".into(),
        album: String::new(),
        duration: 200,
        cover_url: String::new(),
        audio_url: format!("file:///music/{id}.mp3"),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn pending_ids(state: &PlaybackState) -> Vec<&str> {
    state.pending().iter().map(|t| t.id.as_str()).collect()
}

fn current_id(state: &PlaybackState) -> Option<&str> {
    state.current().map(|t| t.id.as_str())
}

// PlaybackState

#[test]
fn new_state_is_empty_and_stopped() {
    let state = PlaybackState::new();
    assert!(state.current().is_none());
    assert!(!state.is_playing());
    assert!(state.pending().is_empty());
    assert_eq!(state.status(), PlaybackStatus::Stopped);
}

#[test]
fn set_current_always_loads_and_plays() {
    let mut state = PlaybackState::new();
    state.enqueue(t("q"));
    state.set_current(t("a"));
    state.toggle_play();
    assert!(!state.is_playing());

    state.set_current(t("b"));
    assert_eq!(current_id(&state), Some("b"));
    assert!(state.is_playing());
    // no implicit enqueue, queue untouched
    assert_eq!(pending_ids(&state), vec!["q"]);
}

#[test]
fn toggle_without_current_is_a_noop() {
    let mut state = PlaybackState::new();
    state.enqueue(t("a"));
    state.enqueue(t("b"));
    let before = state.clone();

    assert!(!state.toggle_play());
    assert!(!state.toggle_play());
    assert_eq!(state, before);
}

#[test]
fn toggle_twice_restores_playing_flag() {
    let mut state = PlaybackState::new();
    state.set_current(t("a"));

    assert!(!state.toggle_play());
    assert_eq!(state.status(), PlaybackStatus::Paused);
    assert!(state.toggle_play());
    assert_eq!(state.status(), PlaybackStatus::Playing);
}

#[test]
fn enqueue_then_dequeue_restores_queue() {
    let mut state = PlaybackState::new();
    state.enqueue(t("a"));
    state.enqueue(t("b"));
    let before = state.pending().clone();

    state.enqueue(t("c"));
    assert_eq!(state.dequeue_by_id("c").map(|t| t.id), Some("c".to_string()));
    assert_eq!(state.pending(), &before);
}

#[test]
fn dequeue_removes_only_first_match_and_ignores_current() {
    let mut state = PlaybackState::new();
    state.set_current(t("a"));
    state.enqueue(t("a"));
    state.enqueue(t("b"));
    state.enqueue(t("a"));

    state.dequeue_by_id("a");
    assert_eq!(pending_ids(&state), vec!["b", "a"]);
    assert_eq!(current_id(&state), Some("a"));

    assert!(state.dequeue_by_id("missing").is_none());
    assert_eq!(pending_ids(&state), vec!["b", "a"]);
}

#[test]
fn enqueue_allows_duplicates() {
    let mut state = PlaybackState::new();
    state.enqueue(t("a"));
    state.enqueue(t("a"));
    assert_eq!(pending_ids(&state), vec!["a", "a"]);
}

#[test]
fn advance_on_empty_queue_changes_nothing() {
    let mut state = PlaybackState::new();
    assert!(state.advance().is_none());
    assert_eq!(state, PlaybackState::new());

    state.set_current(t("a"));
    state.toggle_play();
    let before = state.clone();
    assert!(state.advance().is_none());
    assert_eq!(state, before);
    assert!(!state.is_playing());
}

#[test]
fn advance_pops_head_into_current() {
    let mut state = PlaybackState::new();
    state.enqueue(t("t1"));
    state.enqueue(t("t2"));

    assert_eq!(state.advance().map(|t| t.id.as_str()), Some("t1"));
    assert_eq!(current_id(&state), Some("t1"));
    assert_eq!(pending_ids(&state), vec!["t2"]);
    assert!(state.is_playing());
}

#[test]
fn advance_from_paused_resumes_playing() {
    let mut state = PlaybackState::new();
    state.set_current(t("a"));
    state.toggle_play();
    state.enqueue(t("b"));

    state.advance();
    assert_eq!(current_id(&state), Some("b"));
    assert!(state.is_playing());
}

#[test]
fn queue_scenario_plays_through_and_stops_advancing() {
    let mut state = PlaybackState::new();
    state.enqueue(t("A"));
    state.enqueue(t("B"));

    state.advance();
    assert_eq!(current_id(&state), Some("A"));
    assert_eq!(pending_ids(&state), vec!["B"]);
    assert!(state.is_playing());

    state.advance();
    assert_eq!(current_id(&state), Some("B"));
    assert!(state.pending().is_empty());
    assert!(state.is_playing());

    state.advance();
    assert_eq!(current_id(&state), Some("B"));
    assert!(state.pending().is_empty());
    assert!(state.is_playing());
}

#[test]
fn play_previous_is_unsupported_and_touches_nothing() {
    let mut state = PlaybackState::new();
    state.set_current(t("a"));
    state.enqueue(t("b"));
    let before = state.clone();

    let err = state.play_previous().unwrap_err();
    assert!(matches!(err, PlayerError::Unsupported(_)));
    assert_eq!(err.to_string(), "play previous is not supported");
    assert_eq!(state, before);
}

// Controller: every flag transition is paired with a transport call.

fn controller() -> Controller<RecordingTransport> {
    Controller::new(RecordingTransport::default())
}

#[test]
fn play_loads_then_starts_the_track() {
    let mut c = controller();
    assert_eq!(c.execute(Command::Play(t("a"))).unwrap(), Outcome::Changed);

    assert_eq!(current_id(c.state()), Some("a"));
    assert!(c.state().is_playing());
    assert_eq!(
        c.transport_mut().take_calls(),
        vec![Call::Load("a".into()), Call::Play]
    );
}

#[test]
fn toggle_pairs_flag_with_pause_and_play() {
    let mut c = controller();
    c.execute(Command::Play(t("a"))).unwrap();
    c.transport_mut().take_calls();

    c.execute(Command::TogglePlay).unwrap();
    assert!(!c.state().is_playing());
    assert_eq!(c.transport_mut().take_calls(), vec![Call::Pause]);

    c.execute(Command::TogglePlay).unwrap();
    assert!(c.state().is_playing());
    assert_eq!(c.transport_mut().take_calls(), vec![Call::Play]);
}

#[test]
fn toggle_with_nothing_loaded_issues_no_transport_call() {
    let mut c = controller();
    c.execute(Command::Enqueue(t("a"))).unwrap();

    assert_eq!(c.execute(Command::TogglePlay).unwrap(), Outcome::Unchanged);
    assert!(!c.state().is_playing());
    assert!(c.transport_mut().take_calls().is_empty());
}

#[test]
fn queue_edits_do_not_touch_the_transport() {
    let mut c = controller();
    c.execute(Command::Enqueue(t("a"))).unwrap();
    c.execute(Command::Enqueue(t("b"))).unwrap();
    assert_eq!(
        c.execute(Command::Dequeue("a".into())).unwrap(),
        Outcome::Changed
    );
    assert_eq!(
        c.execute(Command::Dequeue("a".into())).unwrap(),
        Outcome::Unchanged
    );

    assert_eq!(pending_ids(c.state()), vec!["b"]);
    assert!(c.transport_mut().take_calls().is_empty());
}

#[test]
fn next_loads_the_queue_head() {
    let mut c = controller();
    c.execute(Command::Play(t("a"))).unwrap();
    c.execute(Command::TogglePlay).unwrap();
    c.execute(Command::Enqueue(t("b"))).unwrap();
    c.execute(Command::Enqueue(t("c"))).unwrap();
    c.transport_mut().take_calls();

    assert_eq!(c.execute(Command::Next).unwrap(), Outcome::Changed);
    assert_eq!(current_id(c.state()), Some("b"));
    assert_eq!(pending_ids(c.state()), vec!["c"]);
    assert!(c.state().is_playing());
    assert_eq!(
        c.transport_mut().take_calls(),
        vec![Call::Load("b".into()), Call::Play]
    );
}

#[test]
fn next_with_empty_queue_is_silent() {
    let mut c = controller();
    c.execute(Command::Play(t("a"))).unwrap();
    c.transport_mut().take_calls();

    assert_eq!(c.execute(Command::Next).unwrap(), Outcome::Unchanged);
    assert_eq!(current_id(c.state()), Some("a"));
    assert!(c.state().is_playing());
    assert!(c.transport_mut().take_calls().is_empty());
}

#[test]
fn previous_is_rejected_without_side_effects() {
    let mut c = controller();
    c.execute(Command::Play(t("a"))).unwrap();
    c.execute(Command::Enqueue(t("b"))).unwrap();
    c.transport_mut().take_calls();
    let before = c.state().clone();

    let err = c.execute(Command::Previous).unwrap_err();
    assert!(matches!(err, PlayerError::Unsupported(_)));
    assert_eq!(c.state(), &before);
    assert!(c.transport_mut().take_calls().is_empty());
}

#[test]
fn select_toggles_the_current_track_and_plays_others() {
    let mut c = controller();
    c.execute(Command::Select(t("a"))).unwrap();
    c.transport_mut().take_calls();

    c.execute(Command::Select(t("a"))).unwrap();
    assert!(!c.state().is_playing());
    assert_eq!(c.transport_mut().take_calls(), vec![Call::Pause]);

    c.execute(Command::Select(t("b"))).unwrap();
    assert_eq!(current_id(c.state()), Some("b"));
    assert!(c.state().is_playing());
    assert_eq!(
        c.transport_mut().take_calls(),
        vec![Call::Load("b".into()), Call::Play]
    );
}

#[test]
fn transport_failure_is_reported_but_state_keeps_the_track() {
    let mut c = Controller::new(RecordingTransport {
        reject: Some("broken".into()),
        ..RecordingTransport::default()
    });
    let mut track = t("a");
    track.audio_url = "https://cdn.example/broken.mp3".into();

    let err = c.execute(Command::Play(track)).unwrap_err();
    assert!(matches!(
        err,
        PlayerError::Transport(TransportError::UnsupportedResource(_))
    ));
    assert_eq!(current_id(c.state()), Some("a"));
    assert!(c.state().is_playing());
    // play() is never attempted after a failed load
    assert_eq!(c.transport_mut().take_calls(), vec![Call::Load("a".into())]);
}

#[test]
fn seek_is_ignored_without_a_track_and_clamped_to_length() {
    let mut c = controller();
    assert_eq!(
        c.execute(Command::Seek(Duration::from_secs(10))).unwrap(),
        Outcome::Unchanged
    );
    assert!(c.transport_mut().take_calls().is_empty());

    c.execute(Command::Play(t("a"))).unwrap();
    c.transport_mut().take_calls();
    c.execute(Command::Seek(Duration::from_secs(500))).unwrap();
    assert_eq!(
        c.transport_mut().take_calls(),
        vec![Call::Seek(Duration::from_secs(200))]
    );
}

#[test]
fn seek_by_is_relative_and_never_negative() {
    let mut c = controller();
    c.execute(Command::Play(t("a"))).unwrap();
    c.transport_mut().elapsed = Duration::from_secs(30);
    c.transport_mut().take_calls();

    c.execute(Command::SeekBy(15)).unwrap();
    c.execute(Command::SeekBy(-100)).unwrap();
    assert_eq!(
        c.transport_mut().take_calls(),
        vec![
            Call::Seek(Duration::from_secs(45)),
            Call::Seek(Duration::ZERO)
        ]
    );
}

#[test]
fn set_volume_clamps_and_scales() {
    let mut c = controller();
    c.execute(Command::SetVolume(40)).unwrap();
    c.execute(Command::SetVolume(250)).unwrap();
    assert_eq!(c.volume(), 100);
    assert_eq!(
        c.transport_mut().take_calls(),
        vec![Call::SetVolume(0.4), Call::SetVolume(1.0)]
    );
}

#[test]
fn progress_prefers_transport_duration() {
    let mut c = controller();
    assert!(c.progress().is_none());

    c.execute(Command::Play(t("a"))).unwrap();
    c.transport_mut().elapsed = Duration::from_secs(12);
    assert_eq!(
        c.progress(),
        Some(Progress {
            elapsed: Duration::from_secs(12),
            duration: Duration::from_secs(200),
        })
    );

    c.transport_mut().duration = Some(Duration::from_secs(201));
    assert_eq!(c.progress().unwrap().duration, Duration::from_secs(201));
}

#[test]
fn track_finished_advances_or_pauses() {
    let mut c = controller();
    c.execute(Command::Play(t("a"))).unwrap();
    c.execute(Command::Enqueue(t("b"))).unwrap();
    c.transport_mut().take_calls();

    c.track_finished(true).unwrap();
    assert_eq!(current_id(c.state()), Some("b"));
    assert_eq!(
        c.transport_mut().take_calls(),
        vec![Call::Load("b".into()), Call::Play]
    );

    // queue drained: the flag follows the silent output
    c.track_finished(true).unwrap();
    assert_eq!(current_id(c.state()), Some("b"));
    assert!(!c.state().is_playing());
    assert_eq!(c.transport_mut().take_calls(), vec![Call::Pause]);

    assert_eq!(c.track_finished(true).unwrap(), Outcome::Unchanged);
}

#[test]
fn track_finished_without_auto_advance_keeps_the_queue() {
    let mut c = controller();
    c.execute(Command::Play(t("a"))).unwrap();
    c.execute(Command::Enqueue(t("b"))).unwrap();

    c.track_finished(false).unwrap();
    assert_eq!(current_id(c.state()), Some("a"));
    assert_eq!(pending_ids(c.state()), vec!["b"]);
    assert!(!c.state().is_playing());
}
