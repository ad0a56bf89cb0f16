use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use crate::playlist::PlaylistCursor;
use crate::publish::StatePublisher;

use super::control::RendererFactory;
use super::state::EngineCore;
use super::types::EngineCmd;

/// How often the worker checks the renderer for a natural end-of-track
/// between commands.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub(super) fn spawn_engine_thread(
    cursor: PlaylistCursor,
    rx: Receiver<EngineCmd>,
    publisher: StatePublisher,
    make_renderer: RendererFactory,
) -> JoinHandle<()> {
    thread::spawn(move || {
        // The renderer is built on the worker thread; it need not be `Send`.
        let renderer = match make_renderer() {
            Ok(renderer) => renderer,
            Err(err) => {
                warn!(%err, "audio renderer unavailable, engine not started");
                return;
            }
        };

        let mut core = EngineCore::new(cursor, renderer, publisher);

        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(cmd) => {
                    if !core.handle(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => core.poll_finished(),
                Err(RecvTimeoutError::Disconnected) => {
                    // Every handle is gone; tear down as if shut down.
                    core.handle(EngineCmd::Shutdown);
                    break;
                }
            }
        }
    })
}
