use std::sync::mpsc;

use super::*;
use crate::engine::{EngineCmd, EngineHandle};

#[test]
fn parse_accepts_exactly_the_four_named_commands() {
    assert_eq!(RemoteCommand::parse("play"), Some(RemoteCommand::Play));
    assert_eq!(RemoteCommand::parse("pause"), Some(RemoteCommand::Pause));
    assert_eq!(RemoteCommand::parse("next"), Some(RemoteCommand::Next));
    assert_eq!(
        RemoteCommand::parse("previous"),
        Some(RemoteCommand::Previous)
    );
    assert_eq!(RemoteCommand::parse("stop"), None);
    assert_eq!(RemoteCommand::parse("Play"), None);
    assert_eq!(RemoteCommand::parse(""), None);
}

#[test]
fn names_round_trip_through_parse() {
    for cmd in [
        RemoteCommand::Play,
        RemoteCommand::Pause,
        RemoteCommand::Next,
        RemoteCommand::Previous,
    ] {
        assert_eq!(RemoteCommand::parse(cmd.name()), Some(cmd));
    }
}

#[test]
fn relay_translates_each_command_one_to_one() {
    let (tx, rx) = mpsc::channel::<EngineCmd>();
    let relay = RemoteCommandRelay::new(EngineHandle::from_sender(tx));

    relay.dispatch(RemoteCommand::Play).unwrap();
    relay.dispatch(RemoteCommand::Pause).unwrap();
    relay.dispatch(RemoteCommand::Next).unwrap();
    relay.dispatch(RemoteCommand::Previous).unwrap();

    assert!(matches!(rx.try_recv(), Ok(EngineCmd::Play)));
    assert!(matches!(rx.try_recv(), Ok(EngineCmd::Pause)));
    assert!(matches!(rx.try_recv(), Ok(EngineCmd::Next)));
    assert!(matches!(rx.try_recv(), Ok(EngineCmd::Previous)));
    assert!(rx.try_recv().is_err());
}

#[test]
fn dispatch_named_ignores_unknown_names() {
    let (tx, rx) = mpsc::channel::<EngineCmd>();
    let relay = RemoteCommandRelay::new(EngineHandle::from_sender(tx));

    relay.dispatch_named("rewind").unwrap();
    assert!(rx.try_recv().is_err());

    relay.dispatch_named("next").unwrap();
    assert!(matches!(rx.try_recv(), Ok(EngineCmd::Next)));
}

#[test]
fn run_preserves_arrival_order() {
    let (engine_tx, engine_rx) = mpsc::channel::<EngineCmd>();
    let relay = RemoteCommandRelay::new(EngineHandle::from_sender(engine_tx));

    let (cmd_tx, cmd_rx) = mpsc::channel::<RemoteCommand>();
    for cmd in [
        RemoteCommand::Next,
        RemoteCommand::Next,
        RemoteCommand::Pause,
        RemoteCommand::Play,
    ] {
        cmd_tx.send(cmd).unwrap();
    }
    drop(cmd_tx);

    relay.run(cmd_rx);

    assert!(matches!(engine_rx.try_recv(), Ok(EngineCmd::Next)));
    assert!(matches!(engine_rx.try_recv(), Ok(EngineCmd::Next)));
    assert!(matches!(engine_rx.try_recv(), Ok(EngineCmd::Pause)));
    assert!(matches!(engine_rx.try_recv(), Ok(EngineCmd::Play)));
}
