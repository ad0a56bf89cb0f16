//! Engine-facing small types: playback state, commands and errors.

use thiserror::Error;

use crate::publish::SubscriberId;

/// The authoritative playback state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// Transport commands accepted by the engine worker.
#[derive(Debug)]
pub enum EngineCmd {
    /// Start or resume playback. Idempotent while already playing.
    Play,
    /// Pause playback. No-op unless playing.
    Pause,
    /// Skip to the next track, preserving the playing/paused state.
    Next,
    /// Go back to the previous track, preserving the playing/paused state.
    Previous,
    /// Reposition within the current track. Out-of-range values clamp.
    Seek {
        position_ms: i64,
        origin: Option<SubscriberId>,
    },
    /// Advance requested on behalf of a predicted end-of-track. Ignored
    /// when `observed_seq` no longer matches the loaded track.
    Advance { observed_seq: u64 },
    /// Release the renderer, drop all subscribers and exit the worker.
    Shutdown,
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine worker is gone; commands fail fast until a new engine is
    /// started and subscribers re-attach.
    #[error("engine disconnected")]
    Disconnected,
}
