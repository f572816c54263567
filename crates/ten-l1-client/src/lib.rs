//! Façade over an L1 (Bitcoin/Ethereum-style settlement layer) client:
//! fetch blocks by hash/number, fetch the current head, and subscribe to
//! newly-arrived headers. The L1 block provider (`ten-l1-provider`) is the
//! only consumer that should need more than this trait.

mod transport;

pub mod test_support;

pub use transport::TransportError;

use async_trait::async_trait;
use ten_primitives::Hash32;
use tokio::sync::mpsc;

pub type L1BlockId = Hash32;

/// A settlement-layer block: a header plus the raw transactions the
/// cross-chain extractor scans for bus messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct L1Block {
    pub hash: L1BlockId,
    pub parent_hash: L1BlockId,
    pub height: u64,
    pub timestamp: u64,
    pub transactions: Vec<L1Tx>,
}

impl L1Block {
    pub fn header(&self) -> L1Header {
        L1Header {
            hash: self.hash,
            parent_hash: self.parent_hash,
            height: self.height,
        }
    }
}

/// One L1 transaction, reduced to what the cross-chain extractor needs:
/// who it was sent to and an opaque payload. Not a full transaction
/// decoder - decoding the upstream message-bus ABI is out of scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct L1Tx {
    pub to: ten_primitives::Address,
    pub payload: Vec<u8>,
}

/// The header-only projection of an [`L1Block`] streamed by
/// [`L1Client::block_listener`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct L1Header {
    pub hash: L1BlockId,
    pub parent_hash: L1BlockId,
    pub height: u64,
}

pub type HeaderStream = mpsc::Receiver<L1Header>;

/// Handle returned alongside a [`HeaderStream`]; dropping it or calling
/// [`unsubscribe`](Self::unsubscribe) tears down the underlying
/// subscription.
pub struct SubscriptionHandle {
    inner: Box<dyn FnOnce() + Send>,
}

impl SubscriptionHandle {
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            inner: Box::new(teardown),
        }
    }

    pub fn unsubscribe(self) {
        (self.inner)();
    }
}

/// Façade over the L1 node. Implementations talk to a real node over RPC;
/// [`test_support::MockL1Client`] is the in-memory stand-in used by tests.
#[async_trait]
pub trait L1Client: Send + Sync {
    async fn block_by_hash(&self, hash: L1BlockId) -> Result<L1Block, TransportError>;
    async fn block_by_number(&self, height: u64) -> Result<L1Block, TransportError>;
    async fn fetch_head_block(&self) -> Result<L1Block, TransportError>;
    async fn block_listener(&self) -> Result<(HeaderStream, SubscriptionHandle), TransportError>;
}
