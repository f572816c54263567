//! Grounded on `bin/strata/src/errors.rs`'s `InitError`/`ConfigError`
//! split: an outer error chaining io/serde failures that abort the
//! launcher before the runtime even starts, and an inner error for the
//! override-application logic specifically.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("unparsable config toml: {0}")]
    UnparsableConfig(#[from] toml::de::Error),

    #[error("config: {0}")]
    MalformedConfig(#[from] ConfigError),

    #[error("invalid datadir path: {0:?}")]
    InvalidDatadirPath(PathBuf),

    #[error("genesis: {0}")]
    Genesis(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing key: {key} (in {path})")]
    MissingKey { key: String, path: String },

    #[error("can't traverse into non-table key: {key} (in {path})")]
    TraverseNonTableAt { key: String, path: String },

    #[error("invalid override: '{override_str}'")]
    InvalidOverride { override_str: String },
}
