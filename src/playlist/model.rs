use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    /// Opaque handle to the audio resource; the renderer resolves it.
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
}
