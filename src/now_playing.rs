//! The now-playing publisher.
//!
//! Session state is projected into a flat [`NowPlaying`] record on every
//! mutation and tick; the MPRIS player interface reads the shared copy for
//! its `Metadata`/`PlaybackStatus`/`Position` properties. Artwork is the one
//! asynchronous piece and lives in [`artwork`].

use std::sync::{Arc, Mutex};

use url::Url;

pub mod artwork;

#[cfg(test)]
mod tests;

/// The derived display payload pushed to the system now-playing surface.
///
/// Recomputed from session state on demand; never cached beyond one publish
/// cycle (artwork is cached separately, keyed by its locator).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NowPlaying {
    pub track_id: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Elapsed playback time in seconds.
    pub elapsed: f64,
    /// Duration of the loaded resource in seconds, 0.0 when unknown.
    pub duration: f64,
    /// Playback rate: 1.0 while playing, 0.0 otherwise.
    pub rate: f64,
    /// Local locator of the fetched cover image, once available.
    pub art_url: Option<Url>,
}

/// Destination for now-playing projections. Writes are fire-and-forget.
pub trait NowPlayingSink: Send {
    fn publish(&self, now_playing: &NowPlaying);
}

pub type ProjectionHandle = Arc<Mutex<NowPlaying>>;

/// Sink that mirrors the projection into shared state for the MPRIS
/// interfaces to read.
#[derive(Clone, Default)]
pub struct MprisPublisher {
    state: ProjectionHandle,
}

impl MprisPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for the D-Bus property getters.
    pub fn projection_handle(&self) -> ProjectionHandle {
        self.state.clone()
    }
}

impl NowPlayingSink for MprisPublisher {
    fn publish(&self, now_playing: &NowPlaying) {
        if let Ok(mut state) = self.state.lock() {
            *state = now_playing.clone();
        }
    }
}
