use std::sync::mpsc::{self, Sender};
use std::sync::Mutex;
use std::thread::JoinHandle;

use crate::playlist::{Playlist, PlaylistCursor};
use crate::publish::{StatePublisher, SubscriberId};

use super::renderer::{Renderer, RendererError};
use super::sink::RodioRenderer;
use super::thread::spawn_engine_thread;
use super::types::{EngineCmd, EngineError};

/// Builds the renderer on the worker thread, where it lives.
pub type RendererFactory = Box<dyn FnOnce() -> Result<Box<dyn Renderer>, RendererError> + Send>;

/// Cloneable command interface to the engine worker.
///
/// Sends are fire-and-forget; once the worker is torn down every call
/// fails fast with `EngineError::Disconnected`.
#[derive(Clone)]
pub struct EngineHandle {
    tx: Sender<EngineCmd>,
}

impl EngineHandle {
    fn send(&self, cmd: EngineCmd) -> Result<(), EngineError> {
        self.tx.send(cmd).map_err(|_| EngineError::Disconnected)
    }

    pub fn play(&self) -> Result<(), EngineError> {
        self.send(EngineCmd::Play)
    }

    pub fn pause(&self) -> Result<(), EngineError> {
        self.send(EngineCmd::Pause)
    }

    pub fn next(&self) -> Result<(), EngineError> {
        self.send(EngineCmd::Next)
    }

    pub fn previous(&self) -> Result<(), EngineError> {
        self.send(EngineCmd::Previous)
    }

    /// Reposition within the current track; out-of-range values clamp.
    pub fn seek_to(
        &self,
        position_ms: i64,
        origin: Option<SubscriberId>,
    ) -> Result<(), EngineError> {
        self.send(EngineCmd::Seek {
            position_ms,
            origin,
        })
    }

    /// Request an advance on behalf of a predicted end-of-track.
    pub fn advance(&self, observed_seq: u64) -> Result<(), EngineError> {
        self.send(EngineCmd::Advance { observed_seq })
    }

    #[cfg(test)]
    pub(crate) fn from_sender(tx: Sender<EngineCmd>) -> Self {
        Self { tx }
    }
}

/// Owner of the engine worker thread.
pub struct Engine {
    handle: EngineHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Engine {
    /// Start the engine over `playlist` with the default `rodio` renderer.
    pub fn start(playlist: Playlist, publisher: StatePublisher) -> Self {
        Self::start_with(
            playlist,
            publisher,
            Box::new(|| RodioRenderer::new().map(|r| Box::new(r) as Box<dyn Renderer>)),
        )
    }

    /// Start the engine with a custom renderer factory.
    pub fn start_with(
        playlist: Playlist,
        publisher: StatePublisher,
        make_renderer: RendererFactory,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let join = spawn_engine_thread(PlaylistCursor::new(playlist), rx, publisher, make_renderer);
        Self {
            handle: EngineHandle { tx },
            join: Mutex::new(Some(join)),
        }
    }

    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// Tear down: release the renderer, drop all subscribers and join the
    /// worker. Commands sent afterwards fail with `Disconnected`.
    pub fn shutdown(&self) {
        let _ = self.handle.send(EngineCmd::Shutdown);
        if let Ok(mut join) = self.join.lock() {
            if let Some(handle) = join.take() {
                let _ = handle.join();
            }
        }
    }
}
