use super::*;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use crate::library::Track;
use crate::session::SessionSnapshot;

fn make_track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: "Test Title".to_string(),
        artist: "Test Artist".to_string(),
        audio_url: "file:///music/test.mp3".to_string(),
        artwork_url: "https://covers.example/test.jpg".to_string(),
    }
}

#[test]
fn play_routes_to_resume_when_media_is_loaded() {
    let snapshot = SessionSnapshot {
        current: Some(make_track("t")),
        position: 10.0,
        is_playing: false,
        loaded: true,
    };
    assert!(matches!(route_play(&snapshot), Some(SessionCmd::Resume)));
}

#[test]
fn play_routes_to_full_play_for_a_current_but_unloaded_track() {
    let snapshot = SessionSnapshot {
        current: Some(make_track("t")),
        position: 10.0,
        is_playing: false,
        loaded: false,
    };
    match route_play(&snapshot) {
        Some(SessionCmd::Play(track)) => assert_eq!(track.id, "t"),
        other => panic!("expected Play, got {other:?}"),
    }
}

#[test]
fn play_is_not_handled_without_any_track() {
    assert!(route_play(&SessionSnapshot::default()).is_none());
}

#[test]
fn play_pause_prefers_pause_while_playing() {
    let snapshot = SessionSnapshot {
        current: Some(make_track("t")),
        position: 0.0,
        is_playing: true,
        loaded: true,
    };
    assert!(matches!(
        route_play_pause(&snapshot),
        Some(SessionCmd::Pause)
    ));
    assert!(route_play_pause(&SessionSnapshot::default()).is_none());
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let info: SessionInfo = Arc::new(Mutex::new(SessionSnapshot::default()));
    let projection: ProjectionHandle = Arc::new(Mutex::new(NowPlaying::default()));
    let (tx, _rx) = mpsc::channel::<SessionCmd>();
    let iface = PlayerIface {
        tx,
        info: info.clone(),
        projection,
    };

    assert_eq!(iface.playback_status(), "Stopped");

    {
        let mut s = info.lock().unwrap();
        s.current = Some(make_track("t"));
        s.is_playing = true;
    }
    assert_eq!(iface.playback_status(), "Playing");

    {
        let mut s = info.lock().unwrap();
        s.is_playing = false;
    }
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let now_playing = NowPlaying {
        track_id: Some("track-1".to_string()),
        title: Some("Title".to_string()),
        artist: Some("Artist".to_string()),
        elapsed: 12.0,
        duration: 180.0,
        rate: 1.0,
        art_url: Some(url::Url::parse("file:///cache/art.jpg").unwrap()),
    };

    let map = metadata_map(&now_playing);
    for key in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "mpris:length",
        "mpris:artUrl",
    ] {
        assert!(map.contains_key(key), "missing key: {key}");
    }
}

#[test]
fn metadata_omits_unknown_fields() {
    let map = metadata_map(&NowPlaying::default());
    assert!(map.is_empty());

    // Duration 0 means "unknown" and must not be advertised.
    let np = NowPlaying {
        track_id: Some("t".to_string()),
        duration: 0.0,
        ..NowPlaying::default()
    };
    assert!(!metadata_map(&np).contains_key("mpris:length"));
}

#[test]
fn track_object_path_sanitizes_opaque_ids() {
    assert_eq!(
        track_object_path("abc123"),
        "/org/mpris/MediaPlayer2/track/abc123"
    );
    assert_eq!(
        track_object_path("a-b.c/d"),
        "/org/mpris/MediaPlayer2/track/a_b_c_d"
    );
    assert_eq!(
        track_object_path(""),
        "/org/mpris/MediaPlayer2/track/unknown"
    );
}
