//! Playlist types: `Track`, `Playlist` and the wrap-around `PlaylistCursor`.
//!
//! The playlist is fixed at startup and guaranteed non-empty; the cursor is
//! its only mutable part and is owned by the engine worker.

mod cursor;
mod model;

pub use cursor::*;
pub use model::*;

#[cfg(test)]
mod tests;
