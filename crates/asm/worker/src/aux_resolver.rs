//! Auxiliary data resolver for ASM Worker.
//!
//! Resolves auxiliary data requests from subprotocols during pre-processing phase.
//! Fetches Bitcoin transactions and historical manifest hashes with MMR proofs.

use strata_asm_common::{AuxData, AuxRequests, ManifestHashRange, VerifiableManifestHash};
use strata_btc_types::BitcoinTxid;
use strata_primitives::prelude::*;
use tracing::*;

use crate::{WorkerContext, WorkerError, WorkerResult};

/// Auxiliary data resolver that fetches external data required by subprotocols.
///
/// Resolves two types of auxiliary data:
/// 1. Bitcoin transactions by txid
/// 2. Historical manifest hashes with MMR proofs
///
/// The resolver currently has limited implementation:
/// - Bitcoin transaction fetching requires tx indexing (not yet implemented)
/// - MMR proof generation for historical positions requires proof storage (not yet implemented)
pub struct AuxDataResolver<'a> {
    /// Worker context for accessing ASM state
    #[allow(dead_code)]
    context: &'a dyn WorkerContext,
}

impl<'a> AuxDataResolver<'a> {
    /// Creates a new auxiliary data resolver.
    ///
    /// # Arguments
    ///
    /// * `context` - Worker context for ASM state access
    pub fn new(context: &'a dyn WorkerContext) -> Self {
        Self { context }
    }

    /// Resolves all auxiliary data requests from subprotocols.
    ///
    /// This is the main entry point that coordinates resolution of both
    /// Bitcoin transactions and manifest hashes.
    ///
    /// # Arguments
    ///
    /// * `requests` - Collection of auxiliary data requests from pre-processing
    ///
    /// # Returns
    ///
    /// Returns `AuxData` containing:
    /// - Raw Bitcoin transaction data for each requested txid
    /// - Manifest hashes with MMR proofs for each requested height range
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any Bitcoin transaction cannot be fetched
    /// - Any historical manifest hash cannot be resolved
    /// - MMR proof generation fails
    pub fn resolve(&self, requests: &AuxRequests) -> WorkerResult<AuxData> {
        debug!(
            bitcoin_txs = requests.bitcoin_txs().len(),
            manifest_ranges = requests.manifest_hashes().len(),
            "Resolving auxiliary data requests"
        );

        // Resolve Bitcoin transactions
        let bitcoin_txs = self.resolve_bitcoin_txs(requests.bitcoin_txs())?;

        // Resolve manifest hashes with proofs
        let manifest_hashes = self.resolve_manifest_hashes(requests.manifest_hashes())?;

        debug!(
            resolved_txs = bitcoin_txs.len(),
            resolved_manifests = manifest_hashes.len(),
            "Successfully resolved auxiliary data"
        );

        Ok(AuxData::new(manifest_hashes, bitcoin_txs))
    }

    /// Resolves Bitcoin transactions by their txids.
    ///
    /// Fetches raw transaction data from the Bitcoin client for each requested txid.
    ///
    /// # Arguments
    ///
    /// * `txids` - List of Bitcoin transaction IDs to fetch
    ///
    /// # Returns
    ///
    /// Vector of raw Bitcoin transaction data in the same order as requested.
    ///
    /// # Errors
    ///
    /// Returns `WorkerError::BitcoinTxNotFound` if any transaction cannot be fetched.
    fn resolve_bitcoin_txs(&self, txids: &[BitcoinTxid]) -> WorkerResult<Vec<RawBitcoinTx>> {
        if txids.is_empty() {
            return Ok(Vec::new());
        }

        debug!(count = txids.len(), "Resolving Bitcoin transactions");

        let mut resolved_txs = Vec::with_capacity(txids.len());

        for txid in txids {
            trace!(?txid, "Fetching Bitcoin transaction");

            // Fetch transaction from Bitcoin client
            // Note: bitcoind_async_client::Reader doesn't have get_raw_transaction yet,
            // so we'll need to get the block and find the transaction
            let raw_tx = self.fetch_bitcoin_tx(txid)?;

            resolved_txs.push(raw_tx);
        }

        Ok(resolved_txs)
    }

    /// Fetches a single Bitcoin transaction by txid.
    ///
    /// Currently implemented by searching through blocks. This can be optimized
    /// once the Bitcoin client supports direct transaction lookup.
    ///
    /// # Arguments
    ///
    /// * `txid` - Transaction ID to fetch
    ///
    /// # Errors
    ///
    /// Returns `WorkerError::BitcoinTxNotFound` if the transaction cannot be found.
    fn fetch_bitcoin_tx(&self, _txid: &BitcoinTxid) -> WorkerResult<RawBitcoinTx> {
        // TODO: Once bitcoind_async_client supports get_raw_transaction, use that directly.
        // For now, we need to find which block contains this transaction.
        //
        // This is a placeholder implementation. In production, we would either:
        // 1. Have a transaction index in the L1 manager
        // 2. Use Bitcoin client's getrawtransaction RPC
        // 3. Have subprotocols provide block hints with their tx requests

        warn!(?_txid, "Bitcoin transaction lookup not yet fully implemented - would need tx indexing or block hints");

        // Temporary: Return error indicating this needs implementation
        Err(WorkerError::BitcoinTxNotFound(_txid.clone()))
    }

    /// Resolves historical manifest hashes with MMR proofs.
    ///
    /// For each height range, fetches the historical ASM states, extracts manifest hashes,
    /// and generates MMR proofs from the current MMR root.
    ///
    /// # Arguments
    ///
    /// * `ranges` - List of L1 block height ranges to resolve manifest hashes for
    ///
    /// # Returns
    ///
    /// Vector of manifest hashes with their MMR proofs.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Current ASM state cannot be fetched
    /// - Any historical ASM state is missing
    /// - MMR proof generation fails
    fn resolve_manifest_hashes(
        &self,
        ranges: &[ManifestHashRange],
    ) -> WorkerResult<Vec<VerifiableManifestHash>> {
        if ranges.is_empty() {
            return Ok(Vec::new());
        }

        debug!(count = ranges.len(), "Resolving manifest hash ranges");

        // TODO: MMR proof generation for historical positions
        //
        // ISSUE: The current CompactMmr only stores peaks and doesn't support generating
        // proofs for arbitrary historical positions. To properly implement this, we need:
        //
        // 1. Store MMR proofs when manifest hashes are added to the MMR (during STF execution)
        // 2. Persist these proofs in the database alongside ASM states
        // 3. Retrieve stored proofs here instead of generating them
        //
        // Alternative approaches:
        // - Use a full MMR implementation that maintains enough data for proof generation
        // - Reconstruct the MMR state at each historical position (expensive)
        // - Pre-compute and cache proofs for common historical queries
        //
        // For now, this returns Unimplemented error.

        warn!(
            "Manifest hash resolution with MMR proofs not yet fully implemented - requires proof storage/retrieval system"
        );

        Err(WorkerError::Unimplemented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // TODO: Add tests once we have mock implementations
    // - test_resolve_empty_requests
    // - test_resolve_bitcoin_txs
    // - test_resolve_manifest_hashes
    // - test_bitcoin_tx_not_found
    // - test_invalid_manifest_range
}
