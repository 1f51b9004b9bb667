//! The lifecycle persistence bridge.
//!
//! On suspend the session's `{track id, position, playing}` triple is
//! written to durable storage, overwriting any prior snapshot; on resume it
//! is read back and handed to the session. A missing snapshot, or one whose
//! track id is no longer in the queue, means "nothing to restore". There is
//! no versioning and no retry.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::session::{SessionCmd, SessionHandle};


/// The persisted record. Written at suspend, read at most once per resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub track_id: Option<String>,
    pub position: f64,
    pub is_playing: bool,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] toml::de::Error),
}

/// The durable key-value collaborator seam.
pub trait StateStore {
    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;
}

/// TOML file implementation of [`StateStore`].
pub struct TomlStateStore {
    path: PathBuf,
}

impl TomlStateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl StateStore for TomlStateStore {
    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(snapshot)?)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(Some(toml::from_str(&raw)?))
    }
}

/// Resolve the state path from `SEGUE_STATE_PATH` or XDG defaults.
pub fn resolve_state_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SEGUE_STATE_PATH") {
        return Some(PathBuf::from(p));
    }
    default_state_path()
}

/// Compute the default state path under `$XDG_DATA_HOME/segue/session.toml`
/// or `~/.local/share/segue/session.toml` when `XDG_DATA_HOME` is not set.
pub fn default_state_path() -> Option<PathBuf> {
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".local").join("share"))
    } else {
        None
    };

    data_home.map(|d| d.join("segue").join("session.toml"))
}

/// Suspend-side: snapshot the session into the store, overwriting.
pub fn suspend(session: &SessionHandle, store: &dyn StateStore) {
    let state = session.snapshot();
    let snapshot = Snapshot {
        track_id: state.current.map(|t| t.id),
        position: state.position,
        is_playing: state.is_playing,
    };
    match store.save(&snapshot) {
        Ok(()) => info!(track = ?snapshot.track_id, "session state persisted"),
        Err(e) => warn!("failed to persist session state: {e}"),
    }
}

/// Resume-side: hand a persisted snapshot to the session, if there is one.
pub fn restore(session: &SessionHandle, store: &dyn StateStore) {
    match store.load() {
        Ok(Some(snapshot)) => {
            let _ = session.send(SessionCmd::Restore(snapshot));
        }
        Ok(None) => debug!("no persisted session state; nothing to restore"),
        Err(e) => warn!("failed to read persisted session state: {e}"),
    }
}
