//! The crate provides common types and traits for building blocks for defining
//! and interacting with subprotocols in an ASM (Anchor State Machine) framework.

mod aux;
mod error;
mod genesis;
mod log;
mod msg;
mod spec;
mod state;
mod subprotocol;
mod tx;

pub use aux::*;
pub use error::*;
pub use genesis::*;
pub use log::*;
pub use msg::*;
pub use spec::*;
pub use state::*;
pub use subprotocol::*;
pub use tx::*;

// Re-export the logging module
pub mod logging;
