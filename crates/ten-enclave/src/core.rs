//! The enclave's ingestion loop: one call per delivered L1 block, driving
//! `BlockState` forward and advancing the L2 head per spec.md §4.2.
//! Grounded on `asm/worker/service.rs`'s `process_input` pivot-search /
//! replay-forward shape and the `WorkerContext` trait boundary in
//! `asm/worker/traits.rs`.

use parking_lot::RwLock;
use ten_crosschain::{extract_inbound_messages, extract_rollup_publication};
use ten_executor::StateExecutor;
use ten_l1_client::{L1Block, L1BlockId, L1Header};
use ten_primitives::{Address, BatchHeader, Hash32, L2Batch, L2BatchHash, TxHash};
use ten_storage::KvStore;
use tracing::{info, warn};

use crate::{
    errors::EnclaveError,
    mempool::Mempool,
    state::{block_state_key, rollup_state_key, BlockState, IngestionState, RollupState},
    subscriptions::SubscriptionRegistry,
    viewingkeys::ViewingKeyRegistry,
};

/// Owns block/rollup state, the mempool, and the viewing-key registry for
/// one enclave instance. Generic over the KV backend and state executor
/// so tests can run against [`ten_storage::MemStore`] and
/// [`ten_executor::ReferenceExecutor`].
pub struct EnclaveCore<S: KvStore, E: StateExecutor> {
    storage: S,
    executor: E,
    bus_address: Address,
    rollup_address: Address,
    genesis_l1_hash: L1BlockId,
    genesis_state_root: Hash32,
    mempool: Mempool,
    viewing_keys: ViewingKeyRegistry,
    subscriptions: SubscriptionRegistry,
    ingestion_state: RwLock<IngestionState>,
    l1_head: RwLock<Option<L1Header>>,
    head_batch: RwLock<Option<BatchHeader>>,
}

impl<S: KvStore, E: StateExecutor> EnclaveCore<S, E> {
    pub fn new(
        storage: S,
        executor: E,
        bus_address: Address,
        rollup_address: Address,
        genesis_l1_hash: L1BlockId,
        genesis_state_root: Hash32,
    ) -> Self {
        Self {
            storage,
            executor,
            bus_address,
            rollup_address,
            genesis_l1_hash,
            genesis_state_root,
            mempool: Mempool::new(),
            viewing_keys: ViewingKeyRegistry::new(),
            subscriptions: SubscriptionRegistry::new(),
            ingestion_state: RwLock::new(IngestionState::AwaitingGenesis),
            l1_head: RwLock::new(None),
            head_batch: RwLock::new(None),
        }
    }

    /// The configured L1 address a rollup-publication transaction is
    /// addressed to - exposed so the ingestion entrypoint can detect a
    /// publication in a block before calling [`Self::ingest_l1_block`].
    pub fn rollup_address(&self) -> Address {
        self.rollup_address
    }

    pub fn ingestion_state(&self) -> IngestionState {
        *self.ingestion_state.read()
    }

    pub fn mempool(&self) -> &Mempool {
        &self.mempool
    }

    pub fn viewing_keys(&self) -> &ViewingKeyRegistry {
        &self.viewing_keys
    }

    pub fn subscriptions(&self) -> &SubscriptionRegistry {
        &self.subscriptions
    }

    /// The height of the last L1 block this enclave has ingested, or 0
    /// before genesis - backs the public `eth_blockNumber` method.
    pub fn l1_head_height(&self) -> u64 {
        self.l1_head.read().map(|h| h.height).unwrap_or(0)
    }

    /// Runs the per-L1-block procedure of spec.md §4.2: look up the
    /// parent's block state, extract inbound messages, execute the
    /// rollup's batch (if one was published in this block) against the
    /// prior state root, and persist everything atomically.
    ///
    /// `rollup` lets a caller hand in an already-known batch directly
    /// (tests, or a future gossip-fed path); when `None`, the block's own
    /// transactions are scanned for a publication addressed to
    /// [`Self::rollup_address`] - the path every production caller takes,
    /// since the host relays full L1 transaction bodies untouched.
    pub fn ingest_l1_block(
        &self,
        block: &L1Block,
        rollup: Option<L2Batch>,
    ) -> Result<BlockState, EnclaveError> {
        self.transition_ingestion_state(block);

        let parent_state = self.parent_block_state(block)?;
        let messages = extract_inbound_messages(block, self.bus_address);
        let rollup = rollup.or_else(|| extract_rollup_publication(block, self.rollup_address));

        let (new_state_root, found_new_rollup, confirmed_tx_hashes, head_batch_hash) =
            match rollup {
                Some(batch) => self.apply_rollup(&parent_state, &messages, batch, block.timestamp)?,
                None => (
                    parent_state.state_root,
                    false,
                    Vec::new(),
                    parent_state.head_batch_hash,
                ),
            };

        let block_state = BlockState {
            head_batch_hash,
            state_root: new_state_root,
            found_new_rollup,
        };

        self.storage.put(
            &block_state_key(block.hash),
            &borsh::to_vec(&block_state).map_err(|e| EnclaveError::Internal(e.to_string()))?,
        )?;

        self.mempool.remove_confirmed(&confirmed_tx_hashes);
        *self.l1_head.write() = Some(block.header());
        *self.ingestion_state.write() = IngestionState::Tracking;

        Ok(block_state)
    }

    /// Whether a rollup exists at the given L2 height - backs
    /// `eth_getCode`'s height-addressed form, which must tell "no rollup
    /// at this height" apart from "rollup found" (spec.md §9's fix for
    /// the inverted-condition bug in the original).
    pub fn rollup_exists_at_height(&self, height: u64) -> bool {
        ten_storage::read_batch_hash_by_number(&self.storage, height).is_ok()
    }

    /// Whether a rollup with this batch-header hash has ever been
    /// applied - backs `eth_getCode`'s hash-addressed form.
    pub fn rollup_exists(&self, batch_hash: L2BatchHash) -> bool {
        ten_storage::has_batch_header(&self.storage, batch_hash).unwrap_or(false)
    }

    /// The post-execution state snapshot for a given rollup (batch-header
    /// hash), persisted by [`Self::apply_rollup`] the moment that rollup
    /// is applied.
    pub fn rollup_state(&self, batch_hash: L2BatchHash) -> Result<RollupState, EnclaveError> {
        match self.storage.get(&rollup_state_key(batch_hash)) {
            Ok(bytes) => borsh::from_slice(&bytes).map_err(|e| EnclaveError::Decode(e.to_string())),
            Err(ten_storage::StorageError::NotFound) => Err(EnclaveError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    fn transition_ingestion_state(&self, block: &L1Block) {
        let mut state = self.ingestion_state.write();
        match *state {
            IngestionState::AwaitingGenesis => {
                info!(height = block.height, "awaiting genesis, checking candidate block");
            }
            IngestionState::Tracking | IngestionState::Reorganising => {
                let head = *self.l1_head.read();
                if let Some(head) = head {
                    if head.hash != block.parent_hash {
                        warn!(height = block.height, "non-extending block, entering reorganising");
                        *state = IngestionState::Reorganising;
                    }
                }
            }
        }
    }

    fn parent_block_state(&self, block: &L1Block) -> Result<BlockState, EnclaveError> {
        if *self.ingestion_state.read() == IngestionState::AwaitingGenesis {
            if block.hash != self.genesis_l1_hash {
                return Err(EnclaveError::Consistency(
                    "block is not the configured genesis block".to_string(),
                ));
            }
            return Ok(BlockState {
                head_batch_hash: Hash32::ZERO,
                state_root: self.genesis_state_root,
                found_new_rollup: false,
            });
        }

        match self.storage.get(&block_state_key(block.parent_hash)) {
            Ok(bytes) => {
                borsh::from_slice(&bytes).map_err(|e| EnclaveError::Decode(e.to_string()))
            }
            Err(ten_storage::StorageError::NotFound) => Err(EnclaveError::Consistency(format!(
                "unknown parent block state for L1 block {}",
                block.hash
            ))),
            Err(err) => Err(err.into()),
        }
    }

    #[allow(clippy::type_complexity)]
    fn apply_rollup(
        &self,
        parent_state: &BlockState,
        messages: &[ten_crosschain::InboundMessage],
        batch: L2Batch,
        timestamp: u64,
    ) -> Result<(Hash32, bool, Vec<TxHash>, L2BatchHash), EnclaveError> {
        let parent_known = batch.header.parent_hash.is_zero()
            || ten_storage::has_batch_header(&self.storage, batch.header.parent_hash)
                .unwrap_or(false);

        if !parent_known {
            return Err(EnclaveError::Consistency(format!(
                "rollup {} has an unknown parent {} - rejected, not queued",
                batch.header.hash(),
                batch.header.parent_hash
            )));
        }

        let (new_state_root, _receipts) = self
            .executor
            .execute(parent_state.state_root, messages, &batch.txs, timestamp)?;

        ten_storage::add_batch_header(&self.storage, &batch)?;

        let rollup_state = RollupState {
            state_root: new_state_root,
        };
        self.storage.put(
            &rollup_state_key(batch.header.hash()),
            &borsh::to_vec(&rollup_state).map_err(|e| EnclaveError::Internal(e.to_string()))?,
        )?;

        let confirmed_tx_hashes = batch.tx_hashes();
        let current_head = self.head_batch.read().clone();

        let height_advances = match &current_head {
            None => true,
            Some(head) => batch.header.height >= head.height,
        };

        let head_batch_hash = if height_advances {
            *self.head_batch.write() = Some(batch.header.clone());
            batch.header.hash()
        } else {
            current_head
                .map(|h| h.hash())
                .unwrap_or(parent_state.head_batch_hash)
        };

        Ok((new_state_root, true, confirmed_tx_hashes, head_batch_hash))
    }
}
