use super::*;
use chrono::{TimeZone, Utc};
use std::sync::mpsc;

fn make_track() -> Track {
    Track {
        id: "night-drive.mp3".to_string(),
        title: "Night Drive".to_string(),
        artist: "Test Artist".to_string(),
        album: "Test Album".to_string(),
        duration: 215,
        cover_url: "https://cdn.example/covers/night-drive.jpg".to_string(),
        audio_url: "file:///tmp/music/night-drive.mp3".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

fn handle_with_state() -> (MprisHandle, Arc<Mutex<SharedState>>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    (
        MprisHandle {
            state: state.clone(),
        },
        state,
    )
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let (handle, state) = handle_with_state();

    handle.set_track_metadata(Some(&make_track()));
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Night Drive"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.album.as_deref(), Some("Test Album"));
        assert_eq!(s.url.as_deref(), Some("file:///tmp/music/night-drive.mp3"));
        assert_eq!(
            s.art_url.as_deref(),
            Some("https://cdn.example/covers/night-drive.jpg")
        );
        assert_eq!(s.length_micros, Some(215_000_000));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/night_drive_mp3")
        );
    }

    handle.set_track_metadata(None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.album, None);
        assert_eq!(s.url, None);
        assert_eq!(s.art_url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn blank_fields_and_unknown_length_are_left_out() {
    let (handle, state) = handle_with_state();
    let mut track = make_track();
    track.artist = "  ".to_string();
    track.album = String::new();
    track.cover_url = String::new();
    track.duration = 0;

    handle.set_track_metadata(Some(&track));

    let s = state.lock().unwrap();
    assert!(s.artist.is_empty());
    assert_eq!(s.album, None);
    assert_eq!(s.art_url, None);
    assert_eq!(s.length_micros, None);
}

#[test]
fn track_paths_are_valid_for_any_id() {
    for id in ["sub/dir/a b.flac", "", "ÿ-ü", "42"] {
        let path = track_object_path(id).expect("valid object path");
        assert!(path.as_str().starts_with(TRACK_PATH_PREFIX), "{id:?}");
    }
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let (_handle, state) = handle_with_state();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    for (status, expected) in [
        (PlaybackStatus::Stopped, "Stopped"),
        (PlaybackStatus::Playing, "Playing"),
        (PlaybackStatus::Paused, "Paused"),
    ] {
        state.lock().unwrap().playback = status;
        assert_eq!(iface.playback_status(), expected);
    }
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let (handle, state) = handle_with_state();
    let iface = PlayerIface { tx, state };

    assert!(iface.metadata().is_empty());

    handle.set_track_metadata(Some(&make_track()));
    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "xesam:url",
        "mpris:artUrl",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn player_methods_forward_control_commands() {
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let (_handle, state) = handle_with_state();
    let iface = PlayerIface { tx, state };

    iface.play();
    iface.pause();
    iface.play_pause();
    iface.stop();
    iface.next();
    iface.previous();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::Play,
            ControlCmd::Pause,
            ControlCmd::PlayPause,
            ControlCmd::Stop,
            ControlCmd::Next,
            ControlCmd::Prev,
        ]
    );
    assert!(!iface.can_go_previous());
}
