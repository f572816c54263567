//! The state-transition boundary the enclave drives per batch: take the
//! prior state root, the inbound cross-chain messages and L2
//! transactions due this batch, and produce a new state root plus
//! receipts. Grounded on `alpen-ee/exec-chain`'s shape of an externally
//! driven, deterministic state transition fed from a task (`state.rs`,
//! `handle.rs`) - generalised here to a synchronous trait since this
//! spec's executor has no block-tree of its own to track (that is
//! `ten-enclave`'s job).

mod errors;
mod reference;

pub use errors::ExecError;
pub use reference::ReferenceExecutor;

use ten_crosschain::InboundMessage;
use ten_primitives::{EncryptedL2Tx, Hash32, TxHash};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub success: bool,
    pub output: Vec<u8>,
}

/// Deterministic, side-effect-free except through whatever state view the
/// implementation is handed. Not claimed to be EVM-equivalent (§1
/// non-goal) - sufficient for ingestion tests and the simulator.
pub trait StateExecutor {
    fn execute(
        &self,
        prior_state_root: Hash32,
        messages: &[InboundMessage],
        txs: &[EncryptedL2Tx],
        timestamp: u64,
    ) -> Result<(Hash32, Vec<Receipt>), ExecError>;
}
