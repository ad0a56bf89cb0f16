//! Publish/subscribe fan-out for playback snapshots.
//!
//! The engine worker is the only publisher; presentation surfaces attach as
//! subscribers with independent lifecycles. A newly attached subscriber
//! immediately receives the latest snapshot (replay-on-attach), updates to a
//! single subscriber arrive in publish order, and a slow or vanished
//! subscriber never blocks the worker.

use std::sync::mpsc::{self, RecvError, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use crate::engine::PlaybackState;

pub type SubscriberId = u64;

/// Metadata for the currently loaded track, rebuilt on every track change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub artist: String,
    pub duration_ms: u64,
}

/// An immutable `{state, metadata}` pair published at a point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub state: PlaybackState,
    pub metadata: Metadata,
    /// Monotonic track-load sequence number. It changes exactly when the
    /// loaded track changes, letting subscribers tell a track change from a
    /// state-only transition and letting the engine spot stale advance
    /// requests.
    pub track_seq: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Authoritative state + metadata, published on every transition.
    Snapshot(Snapshot),
    /// The current track was repositioned; progress displays resynchronize.
    Seeked { position_ms: u64 },
}

struct SubscriberEntry {
    id: SubscriberId,
    tx: mpsc::Sender<PlayerEvent>,
}

#[derive(Default)]
struct Inner {
    subscribers: Vec<SubscriberEntry>,
    latest: Option<Snapshot>,
    next_id: SubscriberId,
}

/// One-to-many, fire-and-forget relay between the engine worker and its
/// presentation subscribers. Cheap to clone; clones share the subscriber
/// set.
#[derive(Clone, Default)]
pub struct StatePublisher {
    inner: Arc<Mutex<Inner>>,
}

impl StatePublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a subscriber. The latest snapshot, if there is one, is already
    /// queued on the returned subscription when this returns.
    pub fn attach(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let mut id = 0;
        if let Ok(mut inner) = self.inner.lock() {
            inner.next_id += 1;
            id = inner.next_id;
            if let Some(snapshot) = inner.latest.clone() {
                let _ = tx.send(PlayerEvent::Snapshot(snapshot));
            }
            inner.subscribers.push(SubscriberEntry { id, tx });
            debug!(id, "subscriber attached");
        }
        Subscription {
            id,
            rx,
            publisher: self.clone(),
        }
    }

    /// Remove a subscriber; nothing further is delivered to it.
    pub fn detach(&self, id: SubscriberId) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.subscribers.retain(|s| s.id != id);
        }
    }

    /// Deliver `snapshot` to every subscriber, best-effort. Subscribers
    /// whose receiving end is gone are pruned silently; the rest are
    /// unaffected.
    pub fn publish(&self, snapshot: Snapshot) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.latest = Some(snapshot.clone());
            inner
                .subscribers
                .retain(|s| s.tx.send(PlayerEvent::Snapshot(snapshot.clone())).is_ok());
        }
    }

    /// Deliver a seek resync to the originating subscriber, or to everyone
    /// when the seek came from outside any subscriber context.
    pub fn notify_seek(&self, origin: Option<SubscriberId>, position_ms: u64) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.subscribers.retain(|s| {
                if origin.is_some_and(|id| id != s.id) {
                    return true;
                }
                s.tx.send(PlayerEvent::Seeked { position_ms }).is_ok()
            });
        }
    }

    /// Drop every subscriber at once; their receive loops observe a closed
    /// channel and finish. Used by engine teardown.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.subscribers.clear();
        }
    }

    pub fn latest(&self) -> Option<Snapshot> {
        self.inner.lock().ok().and_then(|inner| inner.latest.clone())
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.subscribers.len()).unwrap_or(0)
    }
}

/// Receiving side of an attachment. Dropping it detaches the subscriber.
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::Receiver<PlayerEvent>,
    publisher: StatePublisher,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn recv(&self) -> Result<PlayerEvent, RecvError> {
        self.rx.recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<PlayerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    pub fn try_recv(&self) -> Result<PlayerEvent, TryRecvError> {
        self.rx.try_recv()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.publisher.detach(self.id);
    }
}

#[cfg(test)]
mod tests;
