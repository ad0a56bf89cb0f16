//! Playback engine: the authoritative state machine and its worker thread.
//!
//! Every transport command is serialized through one channel into a single
//! dedicated worker, so no two transitions ever run concurrently. The audio
//! renderer sits behind a trait seam; production uses `rodio`, tests drive
//! the machine with a recording fake.

mod control;
mod renderer;
mod sink;
mod state;
mod thread;
mod types;

pub use control::*;
pub use renderer::*;
pub use sink::*;
pub use types::*;
