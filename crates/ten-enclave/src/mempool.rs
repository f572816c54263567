//! Pending L2 transactions, admitted unconditionally (deduplicated by
//! hash) and removed only on confirmation in a batch - spec.md §4.2's
//! mempool discipline, no age- or size-based eviction.

use std::collections::HashMap;

use parking_lot::RwLock;
use ten_primitives::{EncryptedL2Tx, TxHash};

#[derive(Default)]
pub struct Mempool {
    pending: RwLock<HashMap<TxHash, EncryptedL2Tx>>,
}

impl Mempool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits `tx`, overwriting any existing entry with the same hash -
    /// admission is unconditional, dedup is by hash alone.
    pub fn admit(&self, tx: EncryptedL2Tx) {
        self.pending.write().insert(tx.hash, tx);
    }

    pub fn contains(&self, hash: TxHash) -> bool {
        self.pending.read().contains_key(&hash)
    }

    pub fn len(&self) -> usize {
        self.pending.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every tx hash in `confirmed` - the only way the mempool
    /// shrinks.
    pub fn remove_confirmed(&self, confirmed: &[TxHash]) {
        let mut pending = self.pending.write();
        for hash in confirmed {
            pending.remove(hash);
        }
    }
}

#[cfg(test)]
mod tests {
    use ten_primitives::Hash32;

    use super::*;

    fn tx(byte: u8) -> EncryptedL2Tx {
        EncryptedL2Tx {
            hash: Hash32::new([byte; 32]),
            envelope: vec![byte],
        }
    }

    #[test]
    fn admits_and_dedups_by_hash() {
        let mempool = Mempool::new();
        mempool.admit(tx(1));
        mempool.admit(tx(1));
        assert_eq!(mempool.len(), 1);
    }

    #[test]
    fn removal_only_happens_on_confirmation() {
        let mempool = Mempool::new();
        mempool.admit(tx(1));
        mempool.admit(tx(2));
        mempool.remove_confirmed(&[Hash32::new([1; 32])]);
        assert!(!mempool.contains(Hash32::new([1; 32])));
        assert!(mempool.contains(Hash32::new([2; 32])));
    }
}
