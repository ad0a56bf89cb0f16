//! The renderer seam: whatever actually decodes and plays audio.

use std::path::PathBuf;

use thiserror::Error;

use crate::playlist::Track;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("no audio output device: {0}")]
    Output(String),
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
}

/// Opaque audio renderer driven exclusively by the engine worker.
///
/// `load` must leave the previously loaded resource untouched when it
/// fails; the engine's rollback relies on that.
pub trait Renderer {
    /// Load `track`, replacing the current resource only on success. The
    /// new track starts paused at position zero. Returns the reported
    /// duration in milliseconds (zero when unknown).
    fn load(&mut self, track: &Track) -> Result<u64, RendererError>;

    /// Start or resume the loaded track.
    fn resume(&mut self);

    /// Pause without losing position.
    fn pause(&mut self);

    /// Reposition within the loaded track; `position_ms` is pre-clamped.
    fn seek(&mut self, position_ms: u64) -> Result<(), RendererError>;

    /// True once the loaded track played to its natural end.
    fn finished(&self) -> bool;

    /// Release the loaded resource.
    fn release(&mut self);
}
