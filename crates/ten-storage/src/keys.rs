//! Deterministic key-prefix schema, as `original_source/go/host/db/batches.go`'s
//! `batchHeaderKey`/`batchKey`/`batchHashKey`/`batchTxHashesKey`/
//! `batchNumberKey`/`headBatch` family, with the same byte layout.

use ten_primitives::L2BatchHash;

const BATCH_HEADER_PREFIX: &[u8] = b"bh";
const BATCH_BODY_PREFIX: &[u8] = b"b";
const BATCH_HASH_BY_NUMBER_PREFIX: &[u8] = b"BH";
const BATCH_TX_HASHES_PREFIX: &[u8] = b"bt";
const BATCH_NUMBER_BY_TX_PREFIX: &[u8] = b"bn";
const TOTAL_TX_COUNT_KEY: &[u8] = b"T";
const HEAD_BATCH_HASH_KEY: &[u8] = b"H";

pub fn batch_header_key(hash: L2BatchHash) -> Vec<u8> {
    concat(BATCH_HEADER_PREFIX, hash.as_bytes())
}

pub fn batch_body_key(hash: L2BatchHash) -> Vec<u8> {
    concat(BATCH_BODY_PREFIX, hash.as_bytes())
}

/// Keyed by the batch's decimal height, matching the Go source's
/// `num.String()` encoding rather than a fixed-width big-endian one, so
/// height ordering is not implied by key byte order (consistent with the
/// original: lookups are always by exact height, never by range scan).
pub fn batch_hash_by_number_key(height: u64) -> Vec<u8> {
    concat(BATCH_HASH_BY_NUMBER_PREFIX, height.to_string().as_bytes())
}

pub fn batch_tx_hashes_key(hash: L2BatchHash) -> Vec<u8> {
    concat(BATCH_TX_HASHES_PREFIX, hash.as_bytes())
}

pub fn batch_number_by_tx_key(tx_hash: ten_primitives::TxHash) -> Vec<u8> {
    concat(BATCH_NUMBER_BY_TX_PREFIX, tx_hash.as_bytes())
}

pub fn total_tx_count_key() -> Vec<u8> {
    TOTAL_TX_COUNT_KEY.to_vec()
}

pub fn head_batch_hash_key() -> Vec<u8> {
    HEAD_BATCH_HASH_KEY.to_vec()
}

fn concat(prefix: &[u8], trailing: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + trailing.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(trailing);
    key
}

#[cfg(test)]
mod tests {
    use ten_primitives::Hash32;

    use super::*;

    #[test]
    fn prefixes_distinguish_otherwise_identical_trailing_bytes() {
        let hash = Hash32::new([7; 32]);
        assert_ne!(batch_header_key(hash), batch_body_key(hash));
        assert_ne!(batch_header_key(hash), batch_tx_hashes_key(hash));
    }

    #[test]
    fn total_tx_count_and_head_hash_keys_are_single_byte_prefixes() {
        assert_eq!(total_tx_count_key(), b"T");
        assert_eq!(head_batch_hash_key(), b"H");
    }
}
