//! The L2 batch header and body, shared by storage, execution, and
//! ingestion. Batch hash = hash of the borsh-encoded header, giving a
//! deterministic encoding without pulling in an RLP or SSZ dependency -
//! matching the teacher's `borsh` workspace dependency for canonical
//! encoding.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::{Address, Hash32, L1BlockId, L2BatchHash, TxHash};

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BatchHeader {
    pub parent_hash: L2BatchHash,
    pub height: u64,
    pub state_root: Hash32,
    pub receipt_root: Hash32,
    pub tx_root: Hash32,
    pub producer: Address,
    pub timestamp: u64,
    pub l1_proof: Option<L1BlockId>,
}

impl BatchHeader {
    /// The batch hash: keccak-free, sha3-free deterministic hash of the
    /// canonical borsh encoding.
    pub fn hash(&self) -> L2BatchHash {
        let encoded = borsh::to_vec(self).expect("BatchHeader encoding is infallible");
        Hash32::new(sha256(&encoded))
    }
}

/// SHA-256 over the canonical borsh encoding. Kept separate from
/// `ten-crypto`'s keccak256, which is reserved for Ethereum-address and
/// viewing-key digests.
fn sha256(data: &[u8]) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct EncryptedL2Tx {
    pub hash: TxHash,
    pub envelope: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct L2Batch {
    pub header: BatchHeader,
    pub txs: Vec<EncryptedL2Tx>,
}

impl L2Batch {
    pub fn tx_hashes(&self) -> Vec<TxHash> {
        self.txs.iter().map(|tx| tx.hash).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header(height: u64) -> BatchHeader {
        BatchHeader {
            parent_hash: Hash32::ZERO,
            height,
            state_root: Hash32::new([1; 32]),
            receipt_root: Hash32::new([2; 32]),
            tx_root: Hash32::new([3; 32]),
            producer: Address::ZERO,
            timestamp: 1000,
            l1_proof: None,
        }
    }

    #[test]
    fn hash_is_deterministic_and_sensitive_to_height() {
        let a = sample_header(1);
        let b = sample_header(2);
        assert_eq!(a.hash(), sample_header(1).hash());
        assert_ne!(a.hash(), b.hash());
    }
}
