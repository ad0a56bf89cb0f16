use thiserror::Error;

use super::model::Track;

#[derive(Debug, Error)]
pub enum PlaylistError {
    /// Startup invariant violation: nothing to play means nothing to run.
    #[error("playlist is empty")]
    Empty,
}

/// Ordered set of tracks established once at startup.
#[derive(Clone, Debug)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    /// Build a playlist. An empty track list aborts initialization.
    pub fn new(tracks: Vec<Track>) -> Result<Self, PlaylistError> {
        if tracks.is_empty() {
            return Err(PlaylistError::Empty);
        }
        Ok(Self { tracks })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }
}

/// Cursor over a `Playlist` with wrap-around navigation.
///
/// Not concurrency-safe on its own; the engine worker serializes access.
#[derive(Debug)]
pub struct PlaylistCursor {
    tracks: Vec<Track>,
    current: usize,
}

impl PlaylistCursor {
    /// Start at the first track.
    pub fn new(playlist: Playlist) -> Self {
        Self {
            tracks: playlist.tracks,
            current: 0,
        }
    }

    pub fn current(&self) -> &Track {
        &self.tracks[self.current]
    }

    /// Advance with wrap-around and return the new current track.
    pub fn next(&mut self) -> &Track {
        self.current = (self.current + 1) % self.tracks.len();
        &self.tracks[self.current]
    }

    /// Retreat with wrap-around and return the new current track.
    pub fn previous(&mut self) -> &Track {
        self.current = (self.current + self.tracks.len() - 1) % self.tracks.len();
        &self.tracks[self.current]
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }
}
