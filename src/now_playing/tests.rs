use super::artwork::cache_file_name;
use super::*;

#[test]
fn publisher_mirrors_the_latest_projection() {
    let publisher = MprisPublisher::new();
    let handle = publisher.projection_handle();

    let np = NowPlaying {
        track_id: Some("t".to_string()),
        title: Some("Title".to_string()),
        artist: Some("Artist".to_string()),
        elapsed: 12.0,
        duration: 180.0,
        rate: 1.0,
        art_url: None,
    };
    publisher.publish(&np);
    assert_eq!(*handle.lock().unwrap(), np);

    // Each publish replaces the whole projection; nothing lingers.
    publisher.publish(&NowPlaying::default());
    assert_eq!(*handle.lock().unwrap(), NowPlaying::default());
}

#[test]
fn default_projection_is_stopped_and_empty() {
    let np = NowPlaying::default();
    assert!(np.track_id.is_none());
    assert_eq!(np.elapsed, 0.0);
    assert_eq!(np.duration, 0.0);
    assert_eq!(np.rate, 0.0);
}

#[test]
fn cache_file_name_is_stable_and_keeps_the_extension() {
    let a = cache_file_name("https://covers.example/a.jpg", "/a.jpg");
    let b = cache_file_name("https://covers.example/a.jpg", "/a.jpg");
    assert_eq!(a, b);
    assert!(a.ends_with(".jpg"));
    // 16 digest octets, hex-encoded, plus the extension. The digest is a
    // content hash of the locator, not a process-seeded one, so keys from
    // earlier runs stay valid.
    assert_eq!(a.len(), 32 + ".jpg".len());
    assert!(a[..32].chars().all(|c| c.is_ascii_hexdigit()));

    let other = cache_file_name("https://covers.example/b.jpg", "/b.jpg");
    assert_ne!(a, other);

    let no_ext = cache_file_name("https://covers.example/art", "/art");
    assert!(no_ext.ends_with(".img"));
}
