//! CLI argument parsing, grounded on `bin/strata/src/args.rs`. Shared by
//! both `bin/ten-enclave` and `bin/ten-host` - each binary's `main.rs`
//! wraps this in its own `argh`-derived top-level struct with binary-
//! specific switches, but the config-path/datadir/rpc/override surface is
//! identical, so it lives here once.

use std::path::PathBuf;

use argh::FromArgs;

#[derive(Clone, Debug, FromArgs)]
/// Common CLI surface for the ten node binaries.
pub struct CommonArgs {
    /// path to the TOML configuration file
    #[argh(option, short = 'c')]
    pub config: PathBuf,

    /// datadir path, overrides the config toml
    #[argh(option, short = 'd')]
    pub datadir: Option<PathBuf>,

    /// rpc host the binary will listen on, overrides the config toml
    #[argh(option)]
    pub rpc_host: Option<String>,

    /// rpc port the binary will listen on, overrides the config toml
    #[argh(option)]
    pub rpc_port: Option<u16>,

    /// path to a genesis JSON document; empty/omitted selects the
    /// built-in testnet genesis
    #[argh(option)]
    pub genesis: Option<PathBuf>,

    /// generic config overrides, e.g. `-o enclave.bus_address=0x...`
    #[argh(option, short = 'o')]
    pub overrides: Vec<String>,
}

impl CommonArgs {
    /// Overrides gathered from dedicated flags, applied in addition to
    /// `--overrides`, matching `bin/strata/src/args.rs::get_internal_overrides`.
    pub fn internal_overrides(&self) -> Result<Vec<String>, crate::errors::InitError> {
        let mut overrides = Vec::new();
        if let Some(datadir) = &self.datadir {
            let dd = datadir
                .to_str()
                .ok_or_else(|| crate::errors::InitError::InvalidDatadirPath(datadir.clone()))?;
            overrides.push(format!("node.datadir={dd}"));
        }
        if let Some(rpc_host) = &self.rpc_host {
            overrides.push(format!("node.rpc_host={rpc_host}"));
        }
        if let Some(rpc_port) = &self.rpc_port {
            overrides.push(format!("node.rpc_port={rpc_port}"));
        }
        Ok(overrides)
    }

    /// All overrides: `-o` strings first, then dedicated flags, matching
    /// the teacher's `get_all_overrides` ordering - a dedicated flag like
    /// `--rpc-port` always wins over a same-keyed `-o` override.
    pub fn all_overrides(&self) -> Result<Vec<String>, crate::errors::InitError> {
        let mut overrides = self.overrides.clone();
        overrides.extend(self.internal_overrides()?);
        Ok(overrides)
    }
}
