//! The session state machine.
//!
//! `PlaybackSession` runs entirely on the control thread; no method here is
//! ever called concurrently. Every state-mutating operation ends in a
//! `publish` so observers and the now-playing surface stay in sync.

use tracing::{debug, warn};
use url::Url;

use crate::engine::MediaEngine;
use crate::library::Track;
use crate::now_playing::{NowPlaying, NowPlayingSink};
use crate::persist::Snapshot;

use super::types::SessionInfo;

/// How a `play` request maps onto the engine, decided purely by identity
/// and load state so the reset-to-zero and preserve-position paths stay in
/// one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PlayRoute {
    /// Same track, media loaded: keep the position, just start the engine.
    ResumeInPlace,
    /// Same track, nothing loaded (state restored from persistence):
    /// reload and seek back to the saved position.
    ReloadAtSavedPosition,
    /// Different track or no current track: full reload from zero.
    LoadFresh,
}

pub(super) fn play_route(current_id: Option<&str>, loaded: bool, track_id: &str) -> PlayRoute {
    if current_id == Some(track_id) {
        if loaded {
            PlayRoute::ResumeInPlace
        } else {
            PlayRoute::ReloadAtSavedPosition
        }
    } else {
        PlayRoute::LoadFresh
    }
}

pub(super) struct PlaybackSession<E: MediaEngine> {
    engine: E,
    sink: Box<dyn NowPlayingSink>,
    info: SessionInfo,

    queue: Vec<Track>,
    current: Option<Track>,
    position: f64,
    playing: bool,
    loaded: bool,

    /// Bumped on every engine (re)load; ticks carrying an older value are
    /// for a resource that no longer exists and are dropped.
    generation: u64,

    /// Resolved artwork: (source locator, local file URL).
    artwork: Option<(String, Url)>,
}

impl<E: MediaEngine> PlaybackSession<E> {
    pub(super) fn new(engine: E, sink: Box<dyn NowPlayingSink>, info: SessionInfo) -> Self {
        Self {
            engine,
            sink,
            info,
            queue: Vec::new(),
            current: None,
            position: 0.0,
            playing: false,
            loaded: false,
            generation: 0,
            artwork: None,
        }
    }

    pub(super) fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the queue wholesale. Session state and the engine are left
    /// alone; a current track that is no longer present is treated as "no
    /// active track" by the next relative-navigation operation.
    pub(super) fn load_queue(&mut self, tracks: Vec<Track>) {
        self.queue = tracks;
        self.publish();
    }

    pub(super) fn play(&mut self, track: Track) {
        let url = match Url::parse(&track.audio_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(track = %track.id, locator = %track.audio_url,
                    "refusing to play malformed audio locator: {e}");
                return;
            }
        };

        let route = play_route(
            self.current.as_ref().map(|t| t.id.as_str()),
            self.loaded,
            &track.id,
        );
        match route {
            PlayRoute::ResumeInPlace => {
                self.engine.play();
                self.playing = true;
            }
            PlayRoute::ReloadAtSavedPosition => {
                let position = self.position;
                self.load_and_play(track, &url, position);
            }
            PlayRoute::LoadFresh => self.load_and_play(track, &url, 0.0),
        }
        self.publish();
    }

    fn load_and_play(&mut self, track: Track, url: &Url, position: f64) {
        // Discard the previous resource before loading; the generation bump
        // invalidates any tick issued for it.
        self.engine.unload();
        self.loaded = false;
        self.generation += 1;

        if let Err(e) = self.engine.load(url) {
            warn!(track = %track.id, "failed to load media: {e}");
            self.playing = false;
            self.publish();
            return;
        }
        self.loaded = true;
        self.engine.seek(position);
        self.engine.play();

        self.position = position;
        self.current = Some(track);
        self.playing = true;
    }

    pub(super) fn pause(&mut self) {
        if !self.loaded {
            debug!("pause with nothing loaded is a no-op");
            return;
        }
        self.engine.pause();
        // Capture the engine's real position; ticks may lag by up to one
        // interval.
        self.position = self.engine.position();
        self.playing = false;
        self.publish();
    }

    pub(super) fn resume(&mut self) {
        if self.playing || !self.loaded {
            debug!("resume is a no-op (already playing or nothing loaded)");
            return;
        }
        self.engine.play();
        self.playing = true;
        self.publish();
    }

    /// Optimistic seek: the position is recorded without waiting for the
    /// engine to confirm.
    pub(super) fn seek(&mut self, position: f64) {
        let position = position.max(0.0);
        self.engine.seek(position);
        self.position = position;
        self.publish();
    }

    pub(super) fn next(&mut self) {
        let Some(index) = self.current_index() else {
            debug!("no next track: no current track in queue");
            return;
        };
        if index + 1 >= self.queue.len() {
            debug!("no next track: already at the end of the queue");
            return;
        }
        let track = self.queue[index + 1].clone();
        self.play(track);
    }

    pub(super) fn previous(&mut self) {
        let Some(index) = self.current_index() else {
            debug!("no previous track: no current track in queue");
            return;
        };
        if index == 0 {
            debug!("no previous track: already at the start of the queue");
            return;
        }
        let track = self.queue[index - 1].clone();
        self.play(track);
    }

    /// Periodic position tick. `generation` is the load generation the tick
    /// was issued under; a mismatch means the resource it belongs to has
    /// been superseded.
    pub(super) fn tick(&mut self, generation: u64) {
        if generation != self.generation || !self.loaded {
            return;
        }
        if self.playing {
            self.position = self.engine.position();
        }
        self.publish();
    }

    /// Apply a persisted snapshot: current track and position are restored
    /// not-playing, the media is loaded paused and seeked, and playback
    /// resumes only when the snapshot said it was playing.
    pub(super) fn restore(&mut self, snapshot: &Snapshot) {
        let Some(track_id) = snapshot.track_id.as_deref() else {
            debug!("snapshot has no track; nothing to restore");
            return;
        };
        let Some(track) = self.queue.iter().find(|t| t.id == track_id).cloned() else {
            debug!(track_id, "persisted track not in queue; nothing to restore");
            return;
        };
        let url = match Url::parse(&track.audio_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(track_id, "persisted track has malformed locator: {e}");
                return;
            }
        };

        self.current = Some(track);
        self.position = snapshot.position.max(0.0);
        self.playing = false;

        self.engine.unload();
        self.loaded = false;
        self.generation += 1;
        match self.engine.load(&url) {
            Ok(()) => {
                self.loaded = true;
                self.engine.seek(self.position);
            }
            Err(e) => warn!(track_id, "could not reload persisted track: {e}"),
        }
        self.publish();

        if snapshot.is_playing {
            self.resume();
        }
    }

    /// Artwork locator the publisher still needs fetched, if any.
    pub(super) fn artwork_wanted(&self) -> Option<String> {
        let track = self.current.as_ref()?;
        if track.artwork_url.is_empty() {
            return None;
        }
        match &self.artwork {
            Some((source, _)) if *source == track.artwork_url => None,
            _ => Some(track.artwork_url.clone()),
        }
    }

    /// Merge a completed artwork fetch, unless the track changed while the
    /// fetch was in flight.
    pub(super) fn artwork_ready(&mut self, source: &str, art_url: Url) {
        let wanted = self.current.as_ref().map(|t| t.artwork_url.as_str());
        if wanted != Some(source) {
            debug!(source, "discarding artwork for a track no longer current");
            return;
        }
        self.artwork = Some((source.to_string(), art_url));
        self.publish();
    }

    pub(super) fn projection(&self) -> NowPlaying {
        let art_url = match (&self.artwork, &self.current) {
            (Some((source, url)), Some(track)) if *source == track.artwork_url => {
                Some(url.clone())
            }
            _ => None,
        };
        NowPlaying {
            track_id: self.current.as_ref().map(|t| t.id.clone()),
            title: self.current.as_ref().map(|t| t.title.clone()),
            artist: self.current.as_ref().map(|t| t.artist.clone()),
            elapsed: self.position,
            duration: if self.loaded { self.engine.duration() } else { 0.0 },
            rate: if self.playing { 1.0 } else { 0.0 },
            art_url,
        }
    }

    /// Tear down the engine while leaving the shared state describing the
    /// session as it was at quit: the suspend side of the lifecycle bridge
    /// reads `{current, position, is_playing}` from it after the control
    /// thread has exited, so the playing flag must survive teardown.
    pub(super) fn shutdown(&mut self) {
        if self.playing && self.loaded {
            self.position = self.engine.position();
        }
        self.engine.unload();
        self.loaded = false;
        self.publish();
    }

    fn current_index(&self) -> Option<usize> {
        let current = self.current.as_ref()?;
        self.queue.iter().position(|t| t.id == current.id)
    }

    fn publish(&self) {
        if let Ok(mut info) = self.info.lock() {
            info.current = self.current.clone();
            info.position = self.position;
            info.is_playing = self.playing;
            info.loaded = self.loaded;
        }
        self.sink.publish(&self.projection());
    }
}
