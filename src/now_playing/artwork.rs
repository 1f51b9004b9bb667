//! Out-of-band artwork fetching.
//!
//! Fetches run on their own thread so they never block the text/time fields
//! of the projection; the result crosses back into the control sequence
//! exactly once as a [`SessionCmd::ArtworkReady`] message. A failed fetch is
//! discarded silently and never retried; a locator already fetched is served
//! from the on-disk cache.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use url::Url;

use crate::session::SessionCmd;

pub struct ArtworkFetcher {
    cache_dir: PathBuf,
    timeout: Duration,
    /// Fetched locator -> local file URL.
    cache: HashMap<String, Url>,
    /// Last locator handed to a fetch thread; suppresses duplicate requests
    /// and doubles as the no-retry latch for failed fetches.
    requested: Option<String>,
}

impl ArtworkFetcher {
    pub fn new(cache_dir: PathBuf, timeout: Duration) -> Self {
        Self {
            cache_dir,
            timeout,
            cache: HashMap::new(),
            requested: None,
        }
    }

    /// Ensure artwork for `source` is on its way to the session.
    ///
    /// Cache hits report back synchronously through the same channel so the
    /// session sees exactly one delivery path.
    pub fn request(&mut self, source: &str, tx: &Sender<SessionCmd>) {
        if source.is_empty() || self.requested.as_deref() == Some(source) {
            return;
        }
        self.requested = Some(source.to_string());

        if let Some(local) = self.cache.get(source) {
            let _ = tx.send(SessionCmd::ArtworkReady {
                source: source.to_string(),
                art_url: local.clone(),
            });
            return;
        }

        let url = match Url::parse(source) {
            Ok(u) => u,
            Err(e) => {
                warn!(source, "ignoring malformed artwork locator: {e}");
                return;
            }
        };

        let dest = self.cache_dir.join(cache_file_name(source, url.path()));
        if dest.is_file() {
            // Present from an earlier run; adopt it without re-fetching.
            if let Ok(local) = Url::from_file_path(&dest) {
                self.cache.insert(source.to_string(), local.clone());
                let _ = tx.send(SessionCmd::ArtworkReady {
                    source: source.to_string(),
                    art_url: local,
                });
            }
            return;
        }

        let source = source.to_string();
        let timeout = self.timeout;
        let tx = tx.clone();
        thread::spawn(move || fetch(source, url, dest, timeout, tx));
    }

    /// Record a completed fetch so later requests for the same locator are
    /// cache hits.
    pub fn record(&mut self, source: &str, local: &Url) {
        self.cache.insert(source.to_string(), local.clone());
    }
}

fn fetch(source: String, url: Url, dest: PathBuf, timeout: Duration, tx: Sender<SessionCmd>) {
    let client = match reqwest::blocking::Client::builder().timeout(timeout).build() {
        Ok(c) => c,
        Err(e) => {
            warn!("artwork client setup failed: {e}");
            return;
        }
    };

    let response = match client.get(url.as_str()).send().and_then(|r| r.error_for_status()) {
        Ok(r) => r,
        Err(e) => {
            debug!(source, "artwork fetch failed: {e}");
            return;
        }
    };
    let bytes = match response.bytes() {
        Ok(b) => b,
        Err(e) => {
            debug!(source, "artwork read failed: {e}");
            return;
        }
    };

    if let Some(parent) = dest.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("cannot create artwork cache dir: {e}");
            return;
        }
    }
    if let Err(e) = fs::write(&dest, &bytes) {
        warn!("cannot write artwork cache file: {e}");
        return;
    }

    if let Ok(local) = Url::from_file_path(&dest) {
        // The session decides whether this is still the current track's art.
        let _ = tx.send(SessionCmd::ArtworkReady {
            source,
            art_url: local,
        });
    }
}

/// Cache file name derived from the locator, keeping the remote extension
/// when there is one. SHA-256 so the on-disk keys stay valid across
/// toolchain and release upgrades.
pub(super) fn cache_file_name(source: &str, url_path: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    let ext = Path::new(url_path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("img");
    format!("{}.{ext}", hex::encode(&digest[..16]))
}
