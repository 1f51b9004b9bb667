use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// One entry of the track list supplied by the external track source.
///
/// Tracks are immutable records: identity is `id`, everything else is
/// descriptive. The session only ever reads them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Locator of the audio resource (e.g. `file:///music/song.mp3`).
    pub audio_url: String,
    /// Locator of the cover image, fetched out-of-band for now-playing.
    #[serde(default)]
    pub artwork_url: String,
}

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("failed to read playlist: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse playlist: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct Playlist {
    #[serde(default)]
    track: Vec<Track>,
}

/// Load a full track list from a TOML playlist file.
///
/// The file holds `[[track]]` tables; an empty or absent list is valid and
/// yields an empty queue.
pub fn load_playlist(path: &Path) -> Result<Vec<Track>, PlaylistError> {
    let raw = fs::read_to_string(path)?;
    let playlist: Playlist = toml::from_str(&raw)?;
    Ok(playlist.track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn load_playlist_parses_tracks_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("playlist.toml");
        fs::write(
            &path,
            r#"
[[track]]
id = "a"
title = "Alpha"
artist = "Anna"
audio_url = "file:///music/alpha.mp3"
artwork_url = "https://covers.example/alpha.jpg"

[[track]]
id = "b"
title = "Beta"
artist = "Bob"
audio_url = "file:///music/beta.mp3"
"#,
        )
        .unwrap();

        let tracks = load_playlist(&path).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, "a");
        assert_eq!(tracks[0].artist, "Anna");
        assert_eq!(tracks[1].title, "Beta");
        // artwork_url is optional and defaults to empty
        assert_eq!(tracks[1].artwork_url, "");
    }

    #[test]
    fn load_playlist_accepts_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("playlist.toml");
        fs::write(&path, "").unwrap();

        let tracks = load_playlist(&path).unwrap();
        assert!(tracks.is_empty());
    }

    #[test]
    fn load_playlist_reports_missing_file_and_bad_toml() {
        let dir = tempdir().unwrap();

        let missing = load_playlist(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(PlaylistError::Io(_))));

        let path = dir.path().join("broken.toml");
        fs::write(&path, "[[track]]\nid = ").unwrap();
        let broken = load_playlist(&path);
        assert!(matches!(broken, Err(PlaylistError::Parse(_))));
    }
}
