//! Execution engine control for Alpen execution environment.

mod control;
mod engine;
mod errors;
mod sync;

pub use control::create_engine_control_task;
pub use engine::AlpenRethExecEngine;
pub use errors::SyncError;
pub use sync::sync_chainstate_to_engine;
