//! In-memory [`L1Client`] backing a programmable canonical chain, with
//! reorg injection. Used by the block provider's and enclave's unit
//! tests in place of a real L1 node. Grounded on the teacher's pattern of
//! hand-rolled test doubles for stateful chain-tracking fixtures
//! (`MockCanonicalChainReader` in `batch_builder/reorg.rs` plays the same
//! role via `mockall`; this one is hand-rolled because tests need to
//! mutate the canonical chain and trigger live subscription pushes across
//! calls, which is awkward to express as a fixed set of mock
//! expectations).

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{HeaderStream, L1Block, L1BlockId, L1Client, L1Header, SubscriptionHandle, TransportError};

#[derive(Default)]
struct ChainState {
    blocks: HashMap<L1BlockId, L1Block>,
    canonical: Vec<L1BlockId>, // index 0 = height 1
    subscribers: Vec<mpsc::Sender<L1Header>>,
    subscriptions_supported: bool,
}

/// A scriptable L1 chain for tests. Build it with [`MockL1Client::new`],
/// append blocks with [`push_block`](Self::push_block) (which notifies any
/// live subscribers), and simulate a reorg with
/// [`reorg_to`](Self::reorg_to).
#[derive(Clone)]
pub struct MockL1Client {
    state: Arc<Mutex<ChainState>>,
}

impl MockL1Client {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ChainState {
                subscriptions_supported: true,
                ..Default::default()
            })),
        }
    }

    pub fn without_subscriptions() -> Self {
        let client = Self::new();
        client.state.lock().unwrap().subscriptions_supported = false;
        client
    }

    /// Appends `block` to the canonical chain (must extend the current
    /// head by one) and notifies live subscribers.
    pub fn push_block(&self, block: L1Block) {
        let mut state = self.state.lock().unwrap();
        state.canonical.push(block.hash);
        let header = block.header();
        state.blocks.insert(block.hash, block);
        state
            .subscribers
            .retain(|tx| tx.try_send(header).is_ok());
    }

    /// Truncates the canonical chain back to (and including) `height`,
    /// simulating a reorg: blocks above `height` stop being canonical,
    /// though they remain fetchable by hash as stale forks.
    pub fn reorg_to(&self, height: u64) {
        let mut state = self.state.lock().unwrap();
        state.canonical.truncate(height as usize);
    }

    pub fn head_height(&self) -> u64 {
        self.state.lock().unwrap().canonical.len() as u64
    }
}

impl Default for MockL1Client {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl L1Client for MockL1Client {
    async fn block_by_hash(&self, hash: L1BlockId) -> Result<L1Block, TransportError> {
        self.state
            .lock()
            .unwrap()
            .blocks
            .get(&hash)
            .cloned()
            .ok_or_else(|| TransportError::NotFound(hash.to_string()))
    }

    async fn block_by_number(&self, height: u64) -> Result<L1Block, TransportError> {
        let state = self.state.lock().unwrap();
        if height == 0 {
            return Err(TransportError::NotFound("height 0".to_string()));
        }
        let hash = state
            .canonical
            .get((height - 1) as usize)
            .copied()
            .ok_or_else(|| TransportError::NotFound(format!("height {height}")))?;
        Ok(state.blocks[&hash].clone())
    }

    async fn fetch_head_block(&self) -> Result<L1Block, TransportError> {
        let state = self.state.lock().unwrap();
        let hash = state
            .canonical
            .last()
            .copied()
            .ok_or_else(|| TransportError::NotFound("empty chain".to_string()))?;
        Ok(state.blocks[&hash].clone())
    }

    async fn block_listener(&self) -> Result<(HeaderStream, SubscriptionHandle), TransportError> {
        let mut state = self.state.lock().unwrap();
        if !state.subscriptions_supported {
            return Err(TransportError::SubscriptionUnsupported);
        }
        let (tx, rx) = mpsc::channel(64);
        state.subscribers.push(tx);
        Ok((rx, SubscriptionHandle::new(|| {})))
    }
}

#[cfg(test)]
mod tests {
    use ten_primitives::Hash32;

    use super::*;

    fn block(height: u64, hash_byte: u8, parent_byte: u8) -> L1Block {
        L1Block {
            hash: Hash32::new([hash_byte; 32]),
            parent_hash: Hash32::new([parent_byte; 32]),
            height,
            timestamp: 1_000 + height,
            transactions: vec![],
        }
    }

    #[tokio::test]
    async fn fetches_pushed_blocks_by_hash_and_number() {
        let client = MockL1Client::new();
        client.push_block(block(1, 1, 0));
        client.push_block(block(2, 2, 1));

        assert_eq!(client.block_by_number(2).await.unwrap().height, 2);
        assert_eq!(
            client.block_by_hash(Hash32::new([1; 32])).await.unwrap().height,
            1
        );
    }

    #[tokio::test]
    async fn reorg_to_truncates_canonical_chain_but_keeps_stale_blocks_fetchable() {
        let client = MockL1Client::new();
        client.push_block(block(1, 1, 0));
        client.push_block(block(2, 2, 1));
        client.reorg_to(1);

        assert_eq!(client.head_height(), 1);
        assert_eq!(client.fetch_head_block().await.unwrap().height, 1);
        // the stale block is still fetchable by hash, as a node would keep it
        assert!(client.block_by_hash(Hash32::new([2; 32])).await.is_ok());
    }

    #[tokio::test]
    async fn subscribers_receive_pushed_headers() {
        let client = MockL1Client::new();
        client.push_block(block(1, 1, 0));
        let (mut rx, _handle) = client.block_listener().await.unwrap();
        client.push_block(block(2, 2, 1));

        let header = rx.recv().await.unwrap();
        assert_eq!(header.height, 2);
    }

    #[tokio::test]
    async fn without_subscriptions_rejects_listener() {
        let client = MockL1Client::without_subscriptions();
        assert!(matches!(
            client.block_listener().await,
            Err(TransportError::SubscriptionUnsupported)
        ));
    }
}
