//! Process configuration and logging initialisation shared by
//! `bin/ten-enclave` and `bin/ten-host`. Grounded on
//! `bin/strata/src/{args.rs,config.rs,context.rs,errors.rs}` - CLI
//! parsing via `argh`, TOML-plus-overrides config loading, and the same
//! `InitError`/`ConfigError` split.

pub mod args;
pub mod config;
pub mod errors;
pub mod logging;

pub use args::CommonArgs;
pub use config::{load_config, EnclaveSection, HostSection, LoggingSection, NodeConfig, NodeSection, RpcSection};
pub use errors::{ConfigError, InitError};
