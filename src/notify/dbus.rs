use std::collections::HashMap;
use std::sync::mpsc::Sender;

use tracing::warn;
use zbus::blocking::Connection;
use zbus::proxy;
use zvariant::Value;

use crate::remote::RemoteCommand;

use super::{NotificationBackend, NotificationView, ToggleAffordance};

#[proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: HashMap<&str, Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;

    fn close_notification(&self, id: u32) -> zbus::Result<()>;

    #[zbus(signal)]
    fn action_invoked(&self, id: u32, action_key: String) -> zbus::Result<()>;
}

/// `org.freedesktop.Notifications` backend: one resident notification,
/// updated in place via `replaces_id` and withdrawn on dismiss.
pub struct DbusNotifier {
    proxy: NotificationsProxyBlocking<'static>,
    app_name: String,
    notification_id: u32,
}

impl DbusNotifier {
    /// Connect to the session bus and forward notification action presses
    /// into `commands` as named remote commands.
    pub fn connect(app_name: &str, commands: Sender<RemoteCommand>) -> zbus::Result<Self> {
        let connection = Connection::session()?;
        let proxy = NotificationsProxyBlocking::new(&connection)?;

        let signals = proxy.receive_action_invoked()?;
        std::thread::spawn(move || {
            for signal in signals {
                let Ok(args) = signal.args() else { continue };
                match RemoteCommand::parse(args.action_key()) {
                    Some(cmd) => {
                        if commands.send(cmd).is_err() {
                            break;
                        }
                    }
                    None => warn!(key = %args.action_key(), "unknown notification action"),
                }
            }
        });

        Ok(Self {
            proxy,
            app_name: app_name.to_string(),
            notification_id: 0,
        })
    }
}

impl NotificationBackend for DbusNotifier {
    fn show(&mut self, view: &NotificationView) {
        let [previous, toggle, next] = view.action_names();
        let toggle_label = match view.toggle {
            ToggleAffordance::Play => "Play",
            ToggleAffordance::Pause => "Pause",
        };
        // Action list alternates key and human-readable label.
        let actions = [previous, "Previous", toggle, toggle_label, next, "Next"];

        let mut hints = HashMap::new();
        hints.insert("resident", Value::from(true));

        match self.proxy.notify(
            &self.app_name,
            self.notification_id,
            "audio-x-generic",
            &view.title,
            &view.artist,
            &actions,
            hints,
            0,
        ) {
            Ok(id) => self.notification_id = id,
            Err(err) => warn!(%err, "failed to show notification"),
        }
    }

    fn dismiss(&mut self) {
        if self.notification_id == 0 {
            return;
        }
        if let Err(err) = self.proxy.close_notification(self.notification_id) {
            warn!(%err, "failed to close notification");
        }
        self.notification_id = 0;
    }
}
