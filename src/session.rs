//! The playback session manager.
//!
//! One control thread owns all session state (current track, queue,
//! position, play/pause flag) and drives the media engine; everything else
//! talks to it through [`SessionCmd`] messages and observes it through the
//! shared [`SessionInfo`] snapshot. Position ticks are generated by the
//! control thread itself and carry the load generation they were issued
//! under, so a tick for a superseded resource can never touch state.

mod handle;
mod manager;
mod thread;
mod types;

pub use handle::SessionHandle;
pub use types::{SessionCmd, SessionInfo, SessionSnapshot};
