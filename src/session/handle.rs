use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::engine::MediaEngine;
use crate::now_playing::NowPlayingSink;
use crate::now_playing::artwork::ArtworkFetcher;

use super::thread::spawn_session_thread;
use super::types::{SessionCmd, SessionInfo, SessionSnapshot};

/// Owning handle to a running playback session.
///
/// The session itself lives on its control thread; this handle is what gets
/// passed to the remote bridge, the persistence bridge and any UI. Dropping
/// the last sender ends the thread; `quit` ends it deterministically.
pub struct SessionHandle {
    tx: Sender<SessionCmd>,
    info: SessionInfo,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl SessionHandle {
    pub fn spawn<E>(
        engine: E,
        sink: Box<dyn NowPlayingSink>,
        artwork: Option<ArtworkFetcher>,
        tick_interval: Duration,
    ) -> Self
    where
        E: MediaEngine + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<SessionCmd>();
        let info: SessionInfo = Arc::new(Mutex::new(SessionSnapshot::default()));

        let join = spawn_session_thread(
            engine,
            sink,
            artwork,
            rx,
            tx.clone(),
            info.clone(),
            tick_interval,
        );

        Self {
            tx,
            info,
            join: Mutex::new(Some(join)),
        }
    }

    pub fn send(&self, cmd: SessionCmd) -> Result<(), mpsc::SendError<SessionCmd>> {
        self.tx.send(cmd)
    }

    /// Extra sender for collaborators that marshal onto the control thread
    /// themselves (remote bridge, artwork completions).
    pub fn sender(&self) -> Sender<SessionCmd> {
        self.tx.clone()
    }

    pub fn info_handle(&self) -> SessionInfo {
        self.info.clone()
    }

    /// Point-in-time copy of the shared session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.info.lock().map(|i| i.clone()).unwrap_or_default()
    }

    /// Block until the control thread exits.
    pub fn wait(&self) {
        if let Ok(mut join) = self.join.lock() {
            if let Some(handle) = join.take() {
                let _ = handle.join();
            }
        }
    }

    pub fn quit(&self) {
        let _ = self.send(SessionCmd::Quit);
        self.wait();
    }
}
