use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/segue/config.toml` or `~/.config/segue/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SEGUE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub remote: RemoteSettings,
    pub artwork: ArtworkSettings,
    pub state: StateSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Interval between position ticks while a track is loaded (milliseconds).
    pub tick_interval_ms: u64,
    /// Whether to restore the persisted session snapshot at startup.
    pub restore_on_start: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            restore_on_start: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    /// Whether to register the MPRIS remote-command surface.
    pub enabled: bool,
    /// Last segment of the bus name (`org.mpris.MediaPlayer2.<identity>`)
    /// and the advertised player identity.
    pub identity: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            identity: "segue".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtworkSettings {
    /// Whether to fetch cover art for the now-playing surface.
    pub enabled: bool,
    /// Cache directory override; defaults to `$XDG_CACHE_HOME/segue/artwork`.
    pub cache_dir: Option<PathBuf>,
    /// HTTP timeout for a single artwork fetch (milliseconds).
    pub timeout_ms: u64,
}

impl Default for ArtworkSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: None,
            timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    /// State file override; defaults to `$XDG_DATA_HOME/segue/session.toml`.
    pub path: Option<PathBuf>,
}
