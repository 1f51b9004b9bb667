//! The control thread: the single execution context on which all session
//! state mutations are serialized.
//!
//! Commands arrive over the channel; the receive timeout doubles as the
//! periodic position tick while a track is loaded, so ticks and commands can
//! never interleave.

use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::engine::MediaEngine;
use crate::now_playing::NowPlayingSink;
use crate::now_playing::artwork::ArtworkFetcher;

use super::manager::PlaybackSession;
use super::types::{SessionCmd, SessionInfo};

pub(super) fn spawn_session_thread<E>(
    engine: E,
    sink: Box<dyn NowPlayingSink>,
    mut artwork: Option<ArtworkFetcher>,
    rx: Receiver<SessionCmd>,
    tx: Sender<SessionCmd>,
    info: SessionInfo,
    tick_interval: Duration,
) -> JoinHandle<()>
where
    E: MediaEngine + Send + 'static,
{
    thread::spawn(move || {
        let mut session = PlaybackSession::new(engine, sink, info);

        loop {
            match rx.recv_timeout(tick_interval) {
                Ok(SessionCmd::LoadQueue(tracks)) => session.load_queue(tracks),
                Ok(SessionCmd::Play(track)) => session.play(track),
                Ok(SessionCmd::Pause) => session.pause(),
                Ok(SessionCmd::Resume) => session.resume(),
                Ok(SessionCmd::Seek(position)) => session.seek(position),
                Ok(SessionCmd::Next) => session.next(),
                Ok(SessionCmd::Previous) => session.previous(),
                Ok(SessionCmd::Restore(snapshot)) => session.restore(&snapshot),
                Ok(SessionCmd::ArtworkReady { source, art_url }) => {
                    if let Some(fetcher) = artwork.as_mut() {
                        fetcher.record(&source, &art_url);
                    }
                    session.artwork_ready(&source, art_url);
                }
                Ok(SessionCmd::Quit) => break,
                Err(RecvTimeoutError::Timeout) => {
                    let generation = session.generation();
                    session.tick(generation);
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }

            // Kick off an artwork fetch whenever the current track's
            // locator is not the one already resolved.
            if let Some(fetcher) = artwork.as_mut() {
                if let Some(source) = session.artwork_wanted() {
                    fetcher.request(&source, &tx);
                }
            }
        }

        session.shutdown();
    })
}
