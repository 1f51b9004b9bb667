//! Wiring: collaborators are constructed here and handed their session
//! handles; nothing below this module knows about startup order.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::config;
use crate::engine::RodioEngine;
use crate::library;
use crate::now_playing::MprisPublisher;
use crate::now_playing::artwork::ArtworkFetcher;
use crate::persist::{self, TomlStateStore};
use crate::remote;
use crate::session::{SessionCmd, SessionHandle};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings();

    let playlist_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "playlist.toml".to_string());
    let tracks = library::load_playlist(Path::new(&playlist_path))?;
    info!(count = tracks.len(), playlist = %playlist_path, "track list loaded");

    let engine = RodioEngine::new()?;
    let publisher = MprisPublisher::new();

    let artwork = settings.artwork.enabled.then(|| {
        ArtworkFetcher::new(
            artwork_cache_dir(&settings),
            Duration::from_millis(settings.artwork.timeout_ms),
        )
    });

    let session = SessionHandle::spawn(
        engine,
        Box::new(publisher.clone()),
        artwork,
        Duration::from_millis(settings.playback.tick_interval_ms),
    );
    session.send(SessionCmd::LoadQueue(tracks))?;

    if settings.remote.enabled {
        remote::spawn_remote(
            settings.remote.identity.clone(),
            session.sender(),
            session.info_handle(),
            publisher.projection_handle(),
        );
    } else {
        warn!("remote surface disabled; the session can only be driven externally");
    }

    let store = settings
        .state
        .path
        .clone()
        .or_else(persist::resolve_state_path)
        .map(TomlStateStore::new);
    if store.is_none() {
        warn!("no usable state path; session state will not be persisted");
    }

    if settings.playback.restore_on_start {
        if let Some(store) = store.as_ref() {
            persist::restore(&session, store);
        }
    }

    // Runs until a remote Quit ends the control thread; the session state
    // is snapshotted on the way out.
    session.wait();

    if let Some(store) = store.as_ref() {
        persist::suspend(&session, store);
    }

    Ok(())
}

fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                warn!("invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent startup.
            warn!("failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}

fn artwork_cache_dir(settings: &config::Settings) -> PathBuf {
    settings.artwork.cache_dir.clone().unwrap_or_else(|| {
        env::var_os("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|h| PathBuf::from(h).join(".cache")))
            .unwrap_or_else(env::temp_dir)
            .join("segue")
            .join("artwork")
    })
}
