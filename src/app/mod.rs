//! Application lifecycle management.
//!
//! The run controller sequences scan-decide-act cycles; the state module
//! holds the per-cycle state that gets rebuilt between them.

mod controller;
mod state;

pub use controller::App;
pub use state::{NextMove, RunState};
