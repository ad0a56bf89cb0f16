//! Remote transport control: named commands and the relay into the engine.
//!
//! Out-of-process surfaces (the D-Bus transport interface, notification
//! action presses) deliver bare command names; the relay translates each
//! one into the engine's command interface. No business logic lives here —
//! commands are forwarded in arrival order, never dropped or reordered.

mod dbus;

pub use dbus::*;

use std::sync::mpsc::Receiver;

use tracing::debug;

use crate::engine::{EngineError, EngineHandle};

/// The four named commands of the remote channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RemoteCommand {
    Play,
    Pause,
    Next,
    Previous,
}

impl RemoteCommand {
    /// Parse a named command; unknown names are `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "play" => Some(Self::Play),
            "pause" => Some(Self::Pause),
            "next" => Some(Self::Next),
            "previous" => Some(Self::Previous),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }
}

/// Forwards remote commands to the engine, one to one.
#[derive(Clone)]
pub struct RemoteCommandRelay {
    engine: EngineHandle,
}

impl RemoteCommandRelay {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn dispatch(&self, cmd: RemoteCommand) -> Result<(), EngineError> {
        debug!(cmd = cmd.name(), "relaying remote command");
        match cmd {
            RemoteCommand::Play => self.engine.play(),
            RemoteCommand::Pause => self.engine.pause(),
            RemoteCommand::Next => self.engine.next(),
            RemoteCommand::Previous => self.engine.previous(),
        }
    }

    /// Dispatch a command by name; unknown names are ignored.
    pub fn dispatch_named(&self, name: &str) -> Result<(), EngineError> {
        match RemoteCommand::parse(name) {
            Some(cmd) => self.dispatch(cmd),
            None => {
                debug!(name, "ignoring unknown remote command");
                Ok(())
            }
        }
    }

    /// Drain `commands` on the calling thread, preserving arrival order,
    /// until the channel closes or the engine disconnects.
    pub fn run(&self, commands: Receiver<RemoteCommand>) {
        for cmd in commands {
            if self.dispatch(cmd).is_err() {
                debug!("engine disconnected, remote relay stopping");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests;
