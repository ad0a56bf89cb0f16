//! `rodio`-backed renderer: one output stream, one sink per loaded track.
//!
//! Seeking rebuilds the sink and skips into a fresh decode of the file, the
//! same primitive used for the initial load. Durations come from `lofty`,
//! which reads them without decoding the whole file.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::playlist::Track;

use super::renderer::{Renderer, RendererError};

pub struct RodioRenderer {
    stream: OutputStream,
    sink: Option<Sink>,
    /// Path of the loaded track; seeks re-decode from it.
    loaded: Option<PathBuf>,
    paused: bool,
}

impl RodioRenderer {
    pub fn new() -> Result<Self, RendererError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| RendererError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped; keep the
        // service's output on tracing only.
        stream.log_on_drop(false);
        Ok(Self {
            stream,
            sink: None,
            loaded: None,
            paused: true,
        })
    }

    /// Create a paused `Sink` for `path` that starts playback at `start_at`.
    fn build_sink(&self, path: &Path, start_at: Duration) -> Result<Sink, RendererError> {
        let file = File::open(path).map_err(|source| RendererError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| RendererError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
            // `skip_duration` is the seeking primitive; Duration::ZERO is fine.
            .skip_duration(start_at);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();
        Ok(sink)
    }
}

impl Renderer for RodioRenderer {
    fn load(&mut self, track: &Track) -> Result<u64, RendererError> {
        let new_sink = self.build_sink(&track.path, Duration::ZERO)?;

        let duration_ms = lofty::read_from_path(&track.path)
            .map(|tagged| tagged.properties().duration().as_millis() as u64)
            .unwrap_or(0);

        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.sink = Some(new_sink);
        self.paused = true;
        self.loaded = Some(track.path.clone());
        Ok(duration_ms)
    }

    fn resume(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
            self.paused = false;
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
            self.paused = true;
        }
    }

    fn seek(&mut self, position_ms: u64) -> Result<(), RendererError> {
        let Some(path) = self.loaded.clone() else {
            return Ok(());
        };

        let new_sink = self.build_sink(&path, Duration::from_millis(position_ms))?;
        if !self.paused {
            new_sink.play();
        }
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.sink = Some(new_sink);
        Ok(())
    }

    fn finished(&self) -> bool {
        self.loaded.is_some() && self.sink.as_ref().is_some_and(|s| s.empty())
    }

    fn release(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.loaded = None;
        self.paused = true;
    }
}
