#![allow(unused_crate_dependencies, reason = "wip")]
//! Tracks and manages the ol chain state for Alpen execution environment.

mod ctx;
mod error;
mod handle;
mod reorg;
mod state;
mod task;

pub use handle::{OLTrackerBuilder, OLTrackerHandle};
pub use state::{init_ol_tracker_state, OLTrackerState};
