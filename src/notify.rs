//! Desktop notification presentation of the playback state.
//!
//! Every published snapshot maps onto a notification view plus a
//! process-foreground directive. The D-Bus backend posts the view to the
//! desktop and feeds action presses back in as named remote commands; a
//! recording backend stands in for it in tests.

mod dbus;

pub use dbus::*;

use tracing::debug;

use crate::engine::PlaybackState;
use crate::publish::{PlayerEvent, Snapshot, Subscription};

/// Label of the middle transport affordance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToggleAffordance {
    Play,
    Pause,
}

/// What the notification displays for a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationView {
    pub title: String,
    pub artist: String,
    pub toggle: ToggleAffordance,
}

impl NotificationView {
    /// The three affordances, each named after the remote command it
    /// triggers.
    pub fn action_names(&self) -> [&'static str; 3] {
        let toggle = match self.toggle {
            ToggleAffordance::Play => "play",
            ToggleAffordance::Pause => "pause",
        };
        ["previous", toggle, "next"]
    }
}

/// Render the notification for `snapshot`; `None` means it is removed.
pub fn render(snapshot: &Snapshot) -> Option<NotificationView> {
    let toggle = match snapshot.state {
        PlaybackState::Playing => ToggleAffordance::Pause,
        PlaybackState::Paused => ToggleAffordance::Play,
        PlaybackState::Stopped => return None,
    };
    Some(NotificationView {
        title: snapshot.metadata.title.clone(),
        artist: snapshot.metadata.artist.clone(),
        toggle,
    })
}

/// Posts and withdraws the notification itself.
pub trait NotificationBackend {
    fn show(&mut self, view: &NotificationView);
    fn dismiss(&mut self);
}

/// Promotes and demotes the process's foreground standing.
pub trait ForegroundLifecycle {
    fn promote(&mut self);
    fn demote(&mut self);
}

/// Records foreground transitions in the log; the actual process-lifecycle
/// wiring is platform glue outside this crate.
#[derive(Default)]
pub struct LoggedForeground {
    foreground: bool,
}

impl ForegroundLifecycle for LoggedForeground {
    fn promote(&mut self) {
        if !self.foreground {
            self.foreground = true;
            debug!("promoted to foreground");
        }
    }

    fn demote(&mut self) {
        if self.foreground {
            self.foreground = false;
            debug!("demoted from foreground");
        }
    }
}

/// Maps playback state onto the notification and the foreground lifecycle.
pub struct NotificationPresenter<B, F> {
    backend: B,
    foreground: F,
}

impl<B: NotificationBackend, F: ForegroundLifecycle> NotificationPresenter<B, F> {
    pub fn new(backend: B, foreground: F) -> Self {
        Self {
            backend,
            foreground,
        }
    }

    /// Re-render for `snapshot`:
    ///
    /// | state   | presentation          | foreground |
    /// |---------|-----------------------|------------|
    /// | Playing | controls, "pause"     | promote    |
    /// | Paused  | controls, "play"      | demote     |
    /// | Stopped | notification removed  | demote     |
    pub fn refresh(&mut self, snapshot: &Snapshot) {
        match render(snapshot) {
            Some(view) => {
                self.backend.show(&view);
                match snapshot.state {
                    PlaybackState::Playing => self.foreground.promote(),
                    _ => self.foreground.demote(),
                }
            }
            None => {
                self.backend.dismiss();
                self.foreground.demote();
            }
        }
    }

    /// Drain `subscription` on the calling thread until the publisher goes
    /// away, re-rendering synchronously on every snapshot. Seek events
    /// carry no notification content and are skipped.
    pub fn run(mut self, subscription: Subscription) {
        while let Ok(event) = subscription.recv() {
            if let PlayerEvent::Snapshot(snapshot) = event {
                self.refresh(&snapshot);
            }
        }
        self.backend.dismiss();
        self.foreground.demote();
    }
}
