use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::warn;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::engine::{EngineHandle, PlaybackState};
use crate::publish::{Snapshot, SubscriberId};

use super::RemoteCommand;

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Option<String>,
    duration_ms: Option<u64>,
    position_ms: u64,
}

/// Writer side of the transport surface, fed by the snapshot-mirroring
/// subscriber.
pub struct TransportSurfaceHandle {
    state: Arc<Mutex<SharedState>>,
}

impl TransportSurfaceHandle {
    pub fn set_snapshot(&self, snapshot: &Snapshot) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = snapshot.state;
            s.title = Some(snapshot.metadata.title.clone());
            s.artist = Some(snapshot.metadata.artist.clone());
            s.duration_ms = Some(snapshot.metadata.duration_ms);
        }
    }

    pub fn set_position(&self, position_ms: u64) {
        if let Ok(mut s) = self.state.lock() {
            s.position_ms = position_ms;
        }
    }
}

struct RootIface {
    identity: String,
    quit_tx: Sender<()>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No window to raise.
    }

    fn quit(&self) {
        let _ = self.quit_tx.send(());
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        &self.identity
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<RemoteCommand>,
    engine: EngineHandle,
    /// Subscriber id of the surface's mirror loop; seeks issued here
    /// resynchronize that subscriber's progress display.
    origin: SubscriberId,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(RemoteCommand::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(RemoteCommand::Previous);
    }

    fn play(&self) {
        let _ = self.tx.send(RemoteCommand::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(RemoteCommand::Pause);
    }

    fn play_pause(&self) {
        // Surface-side translation onto the named commands: the engine's
        // Play/Pause are idempotent, so picking by mirrored state is safe.
        let target = match self.state.lock().map(|s| s.playback) {
            Ok(PlaybackState::Playing) => RemoteCommand::Pause,
            _ => RemoteCommand::Play,
        };
        let _ = self.tx.send(target);
    }

    fn set_position(&self, _track_id: ObjectPath<'_>, position: i64) {
        let _ = self.engine.seek_to(position / 1_000, Some(self.origin));
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn position(&self) -> i64 {
        self.state
            .lock()
            .map(|s| (s.position_ms as i64) * 1_000)
            .unwrap_or(0)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(title) = s.title.clone() {
            if let Ok(v) = OwnedValue::try_from(Value::from(title)) {
                map.insert("xesam:title".to_string(), v);
            }
        }
        if let Some(artist) = s.artist.clone() {
            if let Ok(v) = OwnedValue::try_from(Value::from(vec![artist])) {
                map.insert("xesam:artist".to_string(), v);
            }
        }
        if let Some(duration_ms) = s.duration_ms {
            if let Ok(v) = OwnedValue::try_from(Value::from((duration_ms as i64) * 1_000)) {
                map.insert("mpris:length".to_string(), v);
            }
        }
        map
    }
}

/// Expose the transport surface on the session bus and keep it alive on a
/// dedicated thread. Button presses go out through `tx`; snapshots flow in
/// through the returned handle.
pub fn spawn_transport_surface(
    identity: String,
    tx: Sender<RemoteCommand>,
    quit_tx: Sender<()>,
    engine: EngineHandle,
    origin: SubscriberId,
) -> TransportSurfaceHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let path = "/org/mpris/MediaPlayer2";

            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!(%e, "transport surface: failed to connect to session bus");
                    return;
                }
            };

            let bus_name = format!("org.mpris.MediaPlayer2.{identity}");
            if let Err(e) = connection.request_name(bus_name.as_str()).await {
                warn!(%e, "transport surface: failed to acquire name");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(
                    path,
                    RootIface {
                        identity: identity.clone(),
                        quit_tx,
                    },
                )
                .await
            {
                warn!(%e, "transport surface: failed to register root iface");
                return;
            }

            if let Err(e) = object_server
                .at(
                    path,
                    PlayerIface {
                        tx,
                        engine,
                        origin,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!(%e, "transport surface: failed to register player iface");
                return;
            }

            // Keep the service alive.
            loop {
                Timer::after(Duration::from_secs(3600)).await;
            }
        });
    });

    TransportSurfaceHandle { state }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::engine::EngineCmd;
    use crate::publish::Metadata;

    fn surface() -> (
        TransportSurfaceHandle,
        PlayerIface,
        mpsc::Receiver<RemoteCommand>,
        mpsc::Receiver<EngineCmd>,
    ) {
        let state = Arc::new(Mutex::new(SharedState::default()));
        let (tx, cmd_rx) = mpsc::channel();
        let (engine_tx, engine_rx) = mpsc::channel();
        let iface = PlayerIface {
            tx,
            engine: EngineHandle::from_sender(engine_tx),
            origin: 7,
            state: state.clone(),
        };
        (TransportSurfaceHandle { state }, iface, cmd_rx, engine_rx)
    }

    fn snapshot(state: PlaybackState) -> Snapshot {
        Snapshot {
            state,
            metadata: Metadata {
                title: "Title".to_string(),
                artist: "Artist".to_string(),
                duration_ms: 180_000,
            },
            track_seq: 1,
        }
    }

    #[test]
    fn playback_status_maps_state_to_spec_strings() {
        let (handle, iface, _cmd_rx, _engine_rx) = surface();

        assert_eq!(iface.playback_status(), "Stopped");

        handle.set_snapshot(&snapshot(PlaybackState::Playing));
        assert_eq!(iface.playback_status(), "Playing");

        handle.set_snapshot(&snapshot(PlaybackState::Paused));
        assert_eq!(iface.playback_status(), "Paused");
    }

    #[test]
    fn metadata_mirrors_the_latest_snapshot() {
        let (handle, iface, _cmd_rx, _engine_rx) = surface();
        handle.set_snapshot(&snapshot(PlaybackState::Playing));

        let map = iface.metadata();
        for key in ["xesam:title", "xesam:artist", "mpris:length"] {
            assert!(map.contains_key(key), "missing key: {key}");
        }
    }

    #[test]
    fn position_reports_micros_from_the_mirrored_millis() {
        let (handle, iface, _cmd_rx, _engine_rx) = surface();
        handle.set_position(42_000);
        assert_eq!(iface.position(), 42_000_000);
    }

    #[test]
    fn play_pause_picks_by_mirrored_state() {
        let (handle, iface, cmd_rx, _engine_rx) = surface();

        iface.play_pause();
        assert_eq!(cmd_rx.try_recv(), Ok(RemoteCommand::Play));

        handle.set_snapshot(&snapshot(PlaybackState::Playing));
        iface.play_pause();
        assert_eq!(cmd_rx.try_recv(), Ok(RemoteCommand::Pause));
    }

    #[test]
    fn set_position_seeks_with_the_surface_as_origin() {
        let (_handle, iface, _cmd_rx, engine_rx) = surface();

        let track_id = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/1").unwrap();
        iface.set_position(track_id, 30_000_000);

        match engine_rx.try_recv() {
            Ok(EngineCmd::Seek {
                position_ms,
                origin,
            }) => {
                assert_eq!(position_ms, 30_000);
                assert_eq!(origin, Some(7));
            }
            other => panic!("expected seek command, got {other:?}"),
        }
    }
}
