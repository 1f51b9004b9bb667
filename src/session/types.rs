//! Session command and shared-state types.

use std::sync::{Arc, Mutex};

use url::Url;

use crate::library::Track;
use crate::persist::Snapshot;

/// Commands accepted by the session control thread.
///
/// Transport commands are forwarded as received; idempotence lives in the
/// operations themselves (`Resume` while playing and `Pause` with nothing
/// loaded are no-ops).
#[derive(Debug)]
pub enum SessionCmd {
    /// Replace the queue wholesale with a new track list.
    LoadQueue(Vec<Track>),
    /// Play the given track: resume in place when it is already current,
    /// full reload otherwise.
    Play(Track),
    Pause,
    Resume,
    /// Seek to an absolute position in seconds.
    Seek(f64),
    Next,
    Previous,
    /// Apply a persisted snapshot (resume-side of the lifecycle bridge).
    Restore(Snapshot),
    /// An out-of-band artwork fetch finished; `source` is the locator the
    /// fetch was started for.
    ArtworkReady { source: String, art_url: Url },
    Quit,
}

/// Read-only view of session state shared with the remote bridge, the
/// persistence bridge and any UI.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub current: Option<Track>,
    /// Position in seconds of the loaded track.
    pub position: f64,
    pub is_playing: bool,
    /// Whether the engine currently holds a loaded resource.
    pub loaded: bool,
}

pub type SessionInfo = Arc<Mutex<SessionSnapshot>>;
