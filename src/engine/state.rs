//! Transition logic for the playback state machine.
//!
//! `EngineCore` is the single mutator of `PlaybackState` and the loaded
//! track. The worker thread is a thin driver around it, so every transition
//! stays testable without threads or audio hardware.

use tracing::{debug, error, info};

use crate::playlist::PlaylistCursor;
use crate::publish::{Metadata, Snapshot, StatePublisher, SubscriberId};

use super::renderer::Renderer;
use super::types::{EngineCmd, PlaybackState};

pub(super) enum Step {
    Forward,
    Backward,
}

pub(super) struct EngineCore {
    cursor: PlaylistCursor,
    renderer: Box<dyn Renderer>,
    publisher: StatePublisher,
    state: PlaybackState,
    /// Duration of the loaded track; `None` until a load has succeeded.
    loaded_duration_ms: Option<u64>,
    track_seq: u64,
    /// Guards the natural end-of-track poll: the drained sink must trigger
    /// exactly one advance attempt per loaded track.
    end_handled: bool,
}

impl EngineCore {
    pub(super) fn new(
        cursor: PlaylistCursor,
        renderer: Box<dyn Renderer>,
        publisher: StatePublisher,
    ) -> Self {
        let mut core = Self {
            cursor,
            renderer,
            publisher,
            state: PlaybackState::Stopped,
            loaded_duration_ms: None,
            track_seq: 0,
            end_handled: false,
        };
        // Implicit first load: the cursor's current track is prepared before
        // any command arrives. A failure leaves the engine stopped and
        // unloaded; `Play` retries.
        core.load_current();
        core
    }

    /// Execute one serialized command. Returns false when the worker should
    /// exit.
    pub(super) fn handle(&mut self, cmd: EngineCmd) -> bool {
        match cmd {
            EngineCmd::Play => self.play(),
            EngineCmd::Pause => self.pause(),
            EngineCmd::Next => self.advance(Step::Forward),
            EngineCmd::Previous => self.advance(Step::Backward),
            EngineCmd::Seek {
                position_ms,
                origin,
            } => self.seek(position_ms, origin),
            EngineCmd::Advance { observed_seq } => self.predicted_advance(observed_seq),
            EngineCmd::Shutdown => {
                self.teardown();
                return false;
            }
        }
        true
    }

    /// Natural end-of-track, polled by the worker between commands.
    pub(super) fn poll_finished(&mut self) {
        if self.state == PlaybackState::Playing && !self.end_handled && self.renderer.finished() {
            debug!("track finished, auto-advancing");
            self.end_handled = true;
            self.advance(Step::Forward);
        }
    }

    fn play(&mut self) {
        if self.state == PlaybackState::Playing {
            // Idempotent: no duplicate renderer start.
            return;
        }
        if self.loaded_duration_ms.is_none() && !self.load_current() {
            return;
        }
        self.renderer.resume();
        self.state = PlaybackState::Playing;
        self.publish();
    }

    fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.renderer.pause();
        self.state = PlaybackState::Paused;
        self.publish();
    }

    fn advance(&mut self, step: Step) {
        let target = match step {
            Step::Forward => self.cursor.next().clone(),
            Step::Backward => self.cursor.previous().clone(),
        };
        match self.renderer.load(&target) {
            Ok(duration_ms) => {
                self.track_seq += 1;
                self.loaded_duration_ms = Some(duration_ms);
                self.end_handled = false;
                if self.state == PlaybackState::Playing {
                    self.renderer.resume();
                }
                debug!(title = %target.title, position = self.cursor.position(), "track changed");
                self.publish();
            }
            Err(err) => {
                // Roll back the cursor. The renderer kept the prior
                // resource, so state and current track are unchanged.
                match step {
                    Step::Forward => self.cursor.previous(),
                    Step::Backward => self.cursor.next(),
                };
                error!(path = %target.path.display(), %err, "track change failed, keeping current track");
            }
        }
    }

    fn seek(&mut self, position_ms: i64, origin: Option<SubscriberId>) {
        let Some(duration_ms) = self.loaded_duration_ms else {
            debug!("seek ignored, no track loaded");
            return;
        };
        let clamped = position_ms.max(0) as u64;
        let clamped = if duration_ms > 0 {
            clamped.min(duration_ms)
        } else {
            clamped
        };
        match self.renderer.seek(clamped) {
            Ok(()) => self.publisher.notify_seek(origin, clamped),
            Err(err) => error!(%err, "seek failed"),
        }
    }

    fn predicted_advance(&mut self, observed_seq: u64) {
        if observed_seq != self.track_seq {
            debug!(
                observed_seq,
                current_seq = self.track_seq,
                "stale advance request ignored"
            );
            return;
        }
        self.advance(Step::Forward);
    }

    fn load_current(&mut self) -> bool {
        let track = self.cursor.current().clone();
        match self.renderer.load(&track) {
            Ok(duration_ms) => {
                self.track_seq += 1;
                self.loaded_duration_ms = Some(duration_ms);
                self.end_handled = false;
                info!(title = %track.title, duration_ms, "track loaded");
                self.publish();
                true
            }
            Err(err) => {
                error!(path = %track.path.display(), %err, "failed to load track");
                false
            }
        }
    }

    fn teardown(&mut self) {
        self.renderer.release();
        self.state = PlaybackState::Stopped;
        self.publisher.clear();
        info!("engine torn down");
    }

    fn publish(&mut self) {
        let track = self.cursor.current();
        self.publisher.publish(Snapshot {
            state: self.state,
            metadata: Metadata {
                title: track.title.clone(),
                artist: track.artist.clone(),
                duration_ms: self.loaded_duration_ms.unwrap_or(0),
            },
            track_seq: self.track_seq,
        });
    }
}
