//! Per-subscriber playback progress estimation.
//!
//! Between authoritative snapshots each subscriber advances its own elapsed
//! counter once per second of wall time. The counter resynchronizes exactly
//! on track change and on seek, and a predicted end-of-track turns into a
//! tagged advance request to the engine rather than a local transition, so
//! the prediction and the engine's own end detection converge on one
//! idempotent advance.

use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

use crate::engine::{EngineHandle, PlaybackState};
use crate::publish::{PlayerEvent, Subscription};

/// Wall-time cadence of the local estimator.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

const TICK_STEP_MS: u64 = 1_000;

/// Outcome of a single tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Not ticking: paused, stopped, or already past a predicted end.
    Idle,
    /// Report the running elapsed total to the presentation layer.
    Report(u64),
    /// The local estimate reached the track duration. Ask the engine to
    /// advance; the tag makes a request for an already-replaced track a
    /// no-op.
    PredictEnd { observed_seq: u64 },
}

/// Local progress estimate for one subscriber.
#[derive(Debug, Default)]
pub struct ProgressSynchronizer {
    elapsed_ms: u64,
    duration_ms: u64,
    track_seq: u64,
    state: PlaybackState,
    ticking: bool,
}

impl ProgressSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Fold an authoritative event in. Returns true when the tick cadence
    /// must restart (track change or seek).
    pub fn apply(&mut self, event: &PlayerEvent) -> bool {
        match event {
            PlayerEvent::Snapshot(snapshot) => {
                let track_changed = snapshot.track_seq != self.track_seq;
                if track_changed {
                    self.track_seq = snapshot.track_seq;
                    self.duration_ms = snapshot.metadata.duration_ms;
                    self.elapsed_ms = 0;
                }
                // Pause retains the elapsed total; resume continues from it.
                self.state = snapshot.state;
                self.ticking = snapshot.state == PlaybackState::Playing;
                track_changed
            }
            PlayerEvent::Seeked { position_ms } => {
                self.elapsed_ms = *position_ms;
                self.ticking = self.state == PlaybackState::Playing;
                true
            }
        }
    }

    /// Advance the local estimate by one second of wall time.
    pub fn tick(&mut self) -> Tick {
        if !self.ticking {
            return Tick::Idle;
        }
        self.elapsed_ms += TICK_STEP_MS;
        // A zero duration means the renderer could not report one; end
        // prediction is disabled and the engine's own detection takes over.
        if self.duration_ms > 0 && self.elapsed_ms >= self.duration_ms {
            self.ticking = false;
            return Tick::PredictEnd {
                observed_seq: self.track_seq,
            };
        }
        Tick::Report(self.elapsed_ms)
    }
}

/// What the driver loop hands to the presentation layer.
pub enum ProgressUpdate<'a> {
    /// An authoritative event, already folded into the estimator.
    Event(&'a PlayerEvent),
    /// A locally estimated elapsed total, once per second while playing.
    Elapsed(u64),
}

/// Drive a subscription on the calling thread: fold events as they arrive
/// and tick once per second while playing. Returns when the subscription's
/// sending side goes away (detach or engine teardown), after which no
/// further tick can fire.
pub fn run<F>(subscription: Subscription, engine: EngineHandle, mut observe: F)
where
    F: FnMut(ProgressUpdate<'_>),
{
    let mut sync = ProgressSynchronizer::new();
    let mut deadline = Instant::now() + TICK_INTERVAL;

    loop {
        let wait = deadline.saturating_duration_since(Instant::now());
        match subscription.recv_timeout(wait) {
            Ok(event) => {
                if sync.apply(&event) {
                    deadline = Instant::now() + TICK_INTERVAL;
                }
                observe(ProgressUpdate::Event(&event));
            }
            Err(RecvTimeoutError::Timeout) => {
                // A detach that raced the deadline wins; never tick past it.
                match subscription.try_recv() {
                    Ok(event) => {
                        if sync.apply(&event) {
                            deadline = Instant::now() + TICK_INTERVAL;
                        }
                        observe(ProgressUpdate::Event(&event));
                        continue;
                    }
                    Err(TryRecvError::Disconnected) => break,
                    Err(TryRecvError::Empty) => {}
                }
                match sync.tick() {
                    Tick::Idle => {}
                    Tick::Report(elapsed_ms) => observe(ProgressUpdate::Elapsed(elapsed_ms)),
                    Tick::PredictEnd { observed_seq } => {
                        if engine.advance(observed_seq).is_err() {
                            break;
                        }
                    }
                }
                deadline += TICK_INTERVAL;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
