//! rondo: a background music playback service.
//!
//! One authoritative engine worker owns the playback state machine and the
//! audio renderer; presentation surfaces (desktop notification, session-bus
//! transport controls) attach as publish/subscribe observers and stay in
//! sync without polling.

pub mod config;
pub mod engine;
pub mod library;
pub mod notify;
pub mod playlist;
pub mod progress;
pub mod publish;
pub mod remote;
pub mod runtime;
