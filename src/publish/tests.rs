use std::sync::mpsc::TryRecvError;

use super::*;
use crate::engine::PlaybackState;

fn snapshot(title: &str, state: PlaybackState, track_seq: u64) -> Snapshot {
    Snapshot {
        state,
        metadata: Metadata {
            title: title.to_string(),
            artist: "Artist".to_string(),
            duration_ms: 180_000,
        },
        track_seq,
    }
}

#[test]
fn attach_before_any_publish_delivers_nothing() {
    let publisher = StatePublisher::new();
    let sub = publisher.attach();
    assert!(matches!(sub.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn attach_replays_latest_snapshot() {
    let publisher = StatePublisher::new();
    publisher.publish(snapshot("a", PlaybackState::Stopped, 1));
    publisher.publish(snapshot("d", PlaybackState::Playing, 4));

    let sub = publisher.attach();
    let PlayerEvent::Snapshot(replayed) = sub.try_recv().unwrap() else {
        panic!("expected snapshot replay");
    };
    assert_eq!(replayed.metadata.title, "d");
    assert_eq!(replayed.track_seq, 4);
    // Only the latest snapshot is replayed, not history.
    assert!(matches!(sub.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn events_arrive_in_publish_order_per_subscriber() {
    let publisher = StatePublisher::new();
    let sub = publisher.attach();

    for seq in 1..=5 {
        publisher.publish(snapshot("t", PlaybackState::Playing, seq));
    }

    for expected in 1..=5 {
        let PlayerEvent::Snapshot(got) = sub.try_recv().unwrap() else {
            panic!("expected snapshot");
        };
        assert_eq!(got.track_seq, expected);
    }
}

#[test]
fn dropped_subscriber_is_pruned_without_affecting_others() {
    let publisher = StatePublisher::new();
    let kept = publisher.attach();
    let dropped = publisher.attach();
    assert_eq!(publisher.subscriber_count(), 2);

    drop(dropped);
    // Dropping detaches eagerly.
    assert_eq!(publisher.subscriber_count(), 1);

    publisher.publish(snapshot("a", PlaybackState::Playing, 1));
    assert!(matches!(kept.try_recv(), Ok(PlayerEvent::Snapshot(_))));
}

#[test]
fn detach_stops_delivery_immediately() {
    let publisher = StatePublisher::new();
    let sub = publisher.attach();

    publisher.detach(sub.id());
    publisher.publish(snapshot("a", PlaybackState::Playing, 1));

    // The sender is gone, so the subscriber sees a closed channel rather
    // than a late event.
    assert!(matches!(sub.try_recv(), Err(TryRecvError::Disconnected)));
}

#[test]
fn notify_seek_targets_only_the_origin() {
    let publisher = StatePublisher::new();
    let origin = publisher.attach();
    let other = publisher.attach();

    publisher.notify_seek(Some(origin.id()), 42_000);

    assert!(matches!(
        origin.try_recv(),
        Ok(PlayerEvent::Seeked { position_ms: 42_000 })
    ));
    assert!(matches!(other.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn notify_seek_without_origin_broadcasts() {
    let publisher = StatePublisher::new();
    let first = publisher.attach();
    let second = publisher.attach();

    publisher.notify_seek(None, 1_000);

    assert!(matches!(first.try_recv(), Ok(PlayerEvent::Seeked { .. })));
    assert!(matches!(second.try_recv(), Ok(PlayerEvent::Seeked { .. })));
}

#[test]
fn clear_disconnects_every_subscriber() {
    let publisher = StatePublisher::new();
    let sub = publisher.attach();

    publisher.clear();

    assert_eq!(publisher.subscriber_count(), 0);
    assert!(matches!(sub.try_recv(), Err(TryRecvError::Disconnected)));
}
