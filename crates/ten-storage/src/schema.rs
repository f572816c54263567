//! Batch-index operations over a [`KvStore`], mirroring
//! `original_source/go/host/db/batches.go`'s `AddBatchHeader` atomicity and
//! head-advance condition.

use ten_primitives::{BatchHeader, L2Batch, L2BatchHash};

use crate::{errors::StorageError, keys, KvBatch, KvStore};

/// Writes a batch's header, body, hash<->number index, per-tx reverse
/// index, and total-tx counter in one atomic batch, exactly as
/// `AddBatchHeader` does. The head-hash pointer is advanced only if there
/// is no existing head, or the existing head's height is `<=` the new
/// batch's height - the byte-for-byte condition `AddBatchHeader` guards,
/// distinct from the `>=` ingestion-level head-advance rule that governs
/// which batch the enclave treats as head after evaluating branches.
pub fn add_batch_header<S: KvStore>(store: &S, l2_batch: &L2Batch) -> Result<(), StorageError> {
    let header = &l2_batch.header;
    let hash = header.hash();
    let tx_hashes = l2_batch.tx_hashes();

    let mut batch = store.new_batch();

    let header_bytes = borsh::to_vec(header).map_err(|e| StorageError::Decode(e.to_string()))?;
    batch.put(keys::batch_header_key(hash), header_bytes);

    let body_bytes = borsh::to_vec(l2_batch).map_err(|e| StorageError::Decode(e.to_string()))?;
    batch.put(keys::batch_body_key(hash), body_bytes);

    let tx_hashes_bytes =
        borsh::to_vec(&tx_hashes).map_err(|e| StorageError::Decode(e.to_string()))?;
    batch.put(keys::batch_tx_hashes_key(hash), tx_hashes_bytes);

    batch.put(keys::batch_hash_by_number_key(header.height), hash.as_bytes().to_vec());

    for tx_hash in &tx_hashes {
        batch.put(
            keys::batch_number_by_tx_key(*tx_hash),
            header.height.to_be_bytes().to_vec(),
        );
    }

    let current_total = read_total_tx_count(store)?;
    let new_total = current_total + tx_hashes.len() as u64;
    batch.put(keys::total_tx_count_key(), new_total.to_be_bytes().to_vec());

    let existing_head = read_head_batch_header(store).ok();
    let should_advance_head = match &existing_head {
        None => true,
        Some(existing) => existing.height <= header.height,
    };
    if should_advance_head {
        batch.put(keys::head_batch_hash_key(), hash.as_bytes().to_vec());
    }

    batch.write()
}

pub fn read_batch<S: KvStore>(store: &S, hash: L2BatchHash) -> Result<L2Batch, StorageError> {
    let bytes = store.get(&keys::batch_body_key(hash))?;
    borsh::from_slice(&bytes).map_err(|e| StorageError::Decode(e.to_string()))
}

pub fn read_batch_header<S: KvStore>(
    store: &S,
    hash: L2BatchHash,
) -> Result<BatchHeader, StorageError> {
    let bytes = store.get(&keys::batch_header_key(hash))?;
    borsh::from_slice(&bytes).map_err(|e| StorageError::Decode(e.to_string()))
}

pub fn has_batch_header<S: KvStore>(store: &S, hash: L2BatchHash) -> Result<bool, StorageError> {
    store.has(&keys::batch_header_key(hash))
}

/// Looks up the batch hash recorded at a given height via the `BH` index,
/// distinct from `read_batch_header`'s by-hash lookup - `eth_getCode`'s
/// height-addressed form needs this to tell "no rollup at this height"
/// apart from "rollup found".
pub fn read_batch_hash_by_number<S: KvStore>(
    store: &S,
    height: u64,
) -> Result<L2BatchHash, StorageError> {
    let bytes = store.get(&keys::batch_hash_by_number_key(height))?;
    decode_hash(&bytes)
}

pub fn read_head_batch_header<S: KvStore>(store: &S) -> Result<BatchHeader, StorageError> {
    let hash_bytes = store.get(&keys::head_batch_hash_key())?;
    let hash = decode_hash(&hash_bytes)?;
    read_batch_header(store, hash)
}

pub fn read_total_tx_count<S: KvStore>(store: &S) -> Result<u64, StorageError> {
    match store.get(&keys::total_tx_count_key()) {
        Ok(bytes) => decode_u64(&bytes),
        Err(StorageError::NotFound) => Ok(0),
        Err(err) => Err(err),
    }
}

fn decode_hash(bytes: &[u8]) -> Result<L2BatchHash, StorageError> {
    let array: [u8; 32] = bytes
        .try_into()
        .map_err(|_| StorageError::Decode("expected 32-byte hash".to_string()))?;
    Ok(L2BatchHash::new(array))
}

fn decode_u64(bytes: &[u8]) -> Result<u64, StorageError> {
    let array: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StorageError::Decode("expected 8-byte counter".to_string()))?;
    Ok(u64::from_be_bytes(array))
}

#[cfg(test)]
mod tests {
    use ten_primitives::{Address, BatchHeader, EncryptedL2Tx, Hash32};

    use super::*;
    use crate::MemStore;

    fn batch(height: u64, parent_hash: Hash32, tx_count: usize) -> L2Batch {
        let header = BatchHeader {
            parent_hash,
            height,
            state_root: Hash32::new([height as u8; 32]),
            receipt_root: Hash32::ZERO,
            tx_root: Hash32::ZERO,
            producer: Address::ZERO,
            timestamp: 1000 + height,
            l1_proof: None,
        };
        let txs = (0..tx_count)
            .map(|i| EncryptedL2Tx {
                hash: Hash32::new([(height as u8).wrapping_add(i as u8); 32]),
                envelope: vec![1, 2, 3],
            })
            .collect();
        L2Batch { header, txs }
    }

    #[test]
    fn add_batch_header_writes_every_index_atomically() {
        let store = MemStore::new();
        let b = batch(1, Hash32::ZERO, 2);
        let hash = b.header.hash();
        add_batch_header(&store, &b).unwrap();

        assert_eq!(read_batch(&store, hash).unwrap(), b);
        assert_eq!(read_batch_header(&store, hash).unwrap(), b.header);
        assert_eq!(read_total_tx_count(&store).unwrap(), 2);
        assert_eq!(read_head_batch_header(&store).unwrap(), b.header);
    }

    #[test]
    fn head_advances_when_new_batch_height_is_greater_or_equal() {
        let store = MemStore::new();
        let b1 = batch(1, Hash32::ZERO, 0);
        add_batch_header(&store, &b1).unwrap();

        let b2 = batch(2, b1.header.hash(), 1);
        add_batch_header(&store, &b2).unwrap();
        assert_eq!(read_head_batch_header(&store).unwrap(), b2.header);
    }

    #[test]
    fn total_tx_count_accumulates_across_batches() {
        let store = MemStore::new();
        add_batch_header(&store, &batch(1, Hash32::ZERO, 3)).unwrap();
        add_batch_header(&store, &batch(2, Hash32::new([1; 32]), 2)).unwrap();
        assert_eq!(read_total_tx_count(&store).unwrap(), 5);
    }

    #[test]
    fn reads_a_batch_hash_by_height_and_distinguishes_absence() {
        let store = MemStore::new();
        let b = batch(1, Hash32::ZERO, 1);
        let hash = b.header.hash();
        add_batch_header(&store, &b).unwrap();

        assert_eq!(read_batch_hash_by_number(&store, 1).unwrap(), hash);
        assert!(matches!(
            read_batch_hash_by_number(&store, 2),
            Err(StorageError::NotFound)
        ));
    }

    #[test]
    fn missing_batch_surfaces_not_found_distinct_from_decode_error() {
        let store = MemStore::new();
        assert!(matches!(
            read_batch(&store, Hash32::new([9; 32])),
            Err(StorageError::NotFound)
        ));
    }
}
