//! Process wiring: configuration, library scan, engine startup, subscriber
//! threads and shutdown ordering.

use std::env;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use tracing::{info, warn};

use crate::config::Settings;
use crate::engine::Engine;
use crate::library;
use crate::notify::{DbusNotifier, LoggedForeground, NotificationPresenter};
use crate::playlist::Playlist;
use crate::progress::{self, ProgressUpdate};
use crate::publish::{PlayerEvent, StatePublisher};
use crate::remote::{self, RemoteCommand, RemoteCommandRelay};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    settings
        .validate()
        .map_err(|e| format!("invalid configuration: {e}"))?;

    let dir = env::args().nth(1).unwrap_or_else(|| {
        env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| "Music".to_string())
    });

    let tracks = library::scan(Path::new(&dir), &settings.library);
    info!(count = tracks.len(), dir = %dir, "library scanned");
    let playlist = Playlist::new(tracks)?;

    let publisher = StatePublisher::new();
    let engine = Engine::start(playlist, publisher.clone());

    // Named commands from every remote surface funnel through one channel,
    // so their arrival order is preserved end to end.
    let (command_tx, command_rx) = mpsc::channel::<RemoteCommand>();
    let (quit_tx, quit_rx) = mpsc::channel::<()>();

    // The relay thread is detached: the bus service threads hold command
    // senders for as long as the process lives.
    let relay = RemoteCommandRelay::new(engine.handle());
    thread::spawn(move || relay.run(command_rx));

    // Notification surface: its own subscriber thread re-renders on every
    // snapshot.
    let notify_thread = if settings.notification.enabled {
        match DbusNotifier::connect(&settings.notification.app_name, command_tx.clone()) {
            Ok(backend) => {
                let presenter = NotificationPresenter::new(backend, LoggedForeground::default());
                let subscription = publisher.attach();
                Some(thread::spawn(move || presenter.run(subscription)))
            }
            Err(err) => {
                warn!(%err, "notification surface unavailable");
                None
            }
        }
    } else {
        None
    };

    // Transport surface: mirrors snapshots and locally estimated progress
    // outward, feeds button presses in.
    let mirror_thread = if settings.remote.enabled {
        let subscription = publisher.attach();
        let surface = remote::spawn_transport_surface(
            settings.remote.identity.clone(),
            command_tx.clone(),
            quit_tx.clone(),
            engine.handle(),
            subscription.id(),
        );
        let engine_handle = engine.handle();
        Some(thread::spawn(move || {
            let mut last_seq = 0u64;
            progress::run(subscription, engine_handle, move |update| match update {
                ProgressUpdate::Event(PlayerEvent::Snapshot(snapshot)) => {
                    surface.set_snapshot(snapshot);
                    if snapshot.track_seq != last_seq {
                        last_seq = snapshot.track_seq;
                        surface.set_position(0);
                    }
                }
                ProgressUpdate::Event(PlayerEvent::Seeked { position_ms }) => {
                    surface.set_position(*position_ms);
                }
                ProgressUpdate::Elapsed(elapsed_ms) => surface.set_position(elapsed_ms),
            });
        }))
    } else {
        None
    };

    if settings.playback.autoplay {
        let _ = engine.handle().play();
    }

    info!("rondo is up; quit via the transport surface to exit");
    // Parks until a quit arrives. The local quit_tx stays alive, so a
    // disabled transport surface means running until the process is killed.
    let _ = quit_rx.recv();
    info!("shutting down");

    engine.shutdown();
    drop(command_tx);

    // The cleared publisher ends the subscriber loops.
    if let Some(t) = notify_thread {
        let _ = t.join();
    }
    if let Some(t) = mirror_thread {
        let _ = t.join();
    }

    Ok(())
}
