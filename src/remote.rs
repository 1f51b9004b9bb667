//! The remote command bridge: MPRIS over D-Bus.
//!
//! Registered once at startup. Handlers run on the zbus executor and only
//! ever send [`SessionCmd`] messages, which is how they marshal onto the
//! session's control thread. The play/resume disambiguation lives in
//! [`route_play`]; MPRIS method calls have no reply channel, so an
//! unhandled play is reported through the log instead.

use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::now_playing::{NowPlaying, ProjectionHandle};
use crate::session::{SessionCmd, SessionInfo, SessionSnapshot};

#[cfg(test)]
mod tests;

/// External "play" command: a loaded track resumes in place; a current but
/// unloaded track (restored from persistence) gets a full `play`; with
/// neither, the command is not handled.
pub(crate) fn route_play(snapshot: &SessionSnapshot) -> Option<SessionCmd> {
    if snapshot.loaded {
        Some(SessionCmd::Resume)
    } else {
        snapshot.current.clone().map(SessionCmd::Play)
    }
}

pub(crate) fn route_play_pause(snapshot: &SessionSnapshot) -> Option<SessionCmd> {
    if snapshot.is_playing {
        Some(SessionCmd::Pause)
    } else {
        route_play(snapshot)
    }
}

struct RootIface {
    identity: String,
    tx: Sender<SessionCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // Headless; nothing to raise.
    }

    fn quit(&self) {
        let _ = self.tx.send(SessionCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> String {
        self.identity.clone()
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<SessionCmd>,
    info: SessionInfo,
    projection: ProjectionHandle,
}

impl PlayerIface {
    fn snapshot(&self) -> SessionSnapshot {
        self.info.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn now_playing(&self) -> NowPlaying {
        self.projection.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(SessionCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(SessionCmd::Previous);
    }

    fn play(&self) {
        match route_play(&self.snapshot()) {
            Some(cmd) => {
                let _ = self.tx.send(cmd);
            }
            None => warn!("play command not handled: no track to play"),
        }
    }

    fn pause(&self) {
        let _ = self.tx.send(SessionCmd::Pause);
    }

    fn play_pause(&self) {
        match route_play_pause(&self.snapshot()) {
            Some(cmd) => {
                let _ = self.tx.send(cmd);
            }
            None => warn!("play-pause command not handled: no track to play"),
        }
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let snapshot = self.snapshot();
        if snapshot.current.is_none() {
            "Stopped"
        } else if snapshot.is_playing {
            "Playing"
        } else {
            "Paused"
        }
    }

    #[zbus(property)]
    fn position(&self) -> i64 {
        (self.now_playing().elapsed * 1_000_000.0) as i64
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        metadata_map(&self.now_playing())
    }
}

/// Flatten the projection into the MPRIS metadata map.
pub(crate) fn metadata_map(now_playing: &NowPlaying) -> HashMap<String, OwnedValue> {
    let mut map = HashMap::new();

    let mut put = |key: &str, value: Value<'_>| {
        if let Ok(owned) = OwnedValue::try_from(value) {
            map.insert(key.to_string(), owned);
        }
    };

    if let Some(id) = &now_playing.track_id {
        if let Ok(path) = ObjectPath::try_from(track_object_path(id)) {
            put("mpris:trackid", Value::from(path));
        }
    }
    if let Some(title) = &now_playing.title {
        put("xesam:title", Value::from(title.clone()));
    }
    if let Some(artist) = &now_playing.artist {
        put("xesam:artist", Value::from(vec![artist.clone()]));
    }
    if now_playing.duration > 0.0 {
        put(
            "mpris:length",
            Value::from((now_playing.duration * 1_000_000.0) as i64),
        );
    }
    if let Some(art) = &now_playing.art_url {
        put("mpris:artUrl", Value::from(art.to_string()));
    }

    map
}

/// Track ids are opaque strings; D-Bus object paths are not. Keep the
/// alphanumerics, everything else becomes `_`.
pub(crate) fn track_object_path(id: &str) -> String {
    let sanitized: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if sanitized.is_empty() {
        "/org/mpris/MediaPlayer2/track/unknown".to_string()
    } else {
        format!("/org/mpris/MediaPlayer2/track/{sanitized}")
    }
}

/// Register the MPRIS interfaces on the session bus and keep them alive on
/// a dedicated thread.
pub fn spawn_remote(
    identity: String,
    tx: Sender<SessionCmd>,
    info: SessionInfo,
    projection: ProjectionHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        block_on(async move {
            let path = "/org/mpris/MediaPlayer2";
            let bus_name = format!("org.mpris.MediaPlayer2.{identity}");

            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!("MPRIS: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection.request_name(bus_name.as_str()).await {
                warn!("MPRIS: failed to acquire name {bus_name}: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(
                    path,
                    RootIface {
                        identity,
                        tx: tx.clone(),
                    },
                )
                .await
            {
                warn!("MPRIS: failed to register root interface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    path,
                    PlayerIface {
                        tx,
                        info,
                        projection,
                    },
                )
                .await
            {
                warn!("MPRIS: failed to register player interface: {e}");
                return;
            }

            info!(bus = %bus_name, "remote command surface registered");

            // Keep the service alive.
            loop {
                Timer::after(Duration::from_secs(3600)).await;
            }
        });
    })
}
