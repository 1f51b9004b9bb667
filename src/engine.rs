//! The media-engine seam.
//!
//! The session treats decoding and output as a black box behind
//! [`MediaEngine`]; `RodioEngine` is the real backend, tests plug in a
//! recording fake.

use thiserror::Error;
use url::Url;

mod rodio;

pub use rodio::RodioEngine;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device: {0}")]
    Device(String),
    #[error("unsupported locator scheme `{0}`")]
    UnsupportedScheme(String),
    #[error("failed to open media: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode media: {0}")]
    Decode(String),
}

/// A loaded-or-empty playback engine.
///
/// Positions and durations are seconds. Transport calls on an engine with
/// nothing loaded are no-ops; `load` replaces whatever was loaded before
/// and leaves the new resource paused at its start.
pub trait MediaEngine {
    fn load(&mut self, url: &Url) -> Result<(), EngineError>;
    /// Stop and discard the loaded resource, if any.
    fn unload(&mut self);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: f64);
    /// Current playback position, 0.0 when nothing is loaded.
    fn position(&self) -> f64;
    /// Duration of the loaded resource, 0.0 when unknown or unloaded.
    fn duration(&self) -> f64;
}
