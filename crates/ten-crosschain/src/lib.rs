//! Extracts cross-chain messages bound for the rollup from L1 blocks.
//! Grounded on `original_source/go/enclave/crosschain/processors.go`'s
//! `BlockMessageExtractor` role: only transactions addressed to the
//! configured message-bus contract are relevant, and decoding the
//! upstream bus ABI in full is out of scope (thin wrapper types over
//! upstream Ethereum libraries, not a full decoder).

use ten_l1_client::L1Block;
use ten_primitives::{Address, L2Batch};

/// A message extracted from an L1 transaction addressed to the message
/// bus, to be applied by the state executor before L2 transactions run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub nonce: u64,
    pub sender: Address,
    pub payload: Vec<u8>,
}

const NONCE_LEN: usize = 8;
const SENDER_LEN: usize = 20;
const HEADER_LEN: usize = NONCE_LEN + SENDER_LEN;

/// Scans `block`'s transactions for ones addressed to `bus_address` and
/// decodes each into an [`InboundMessage`]. Pure and side-effect free -
/// the enclave calls this once per ingested L1 block.
///
/// Wire format: `nonce(8, big-endian) || sender(20) || payload`.
/// Malformed payloads (too short to contain the header) are skipped
/// rather than failing the whole block, since a malformed message from
/// L1 should not block ingestion of everything else in the block.
pub fn extract_inbound_messages(block: &L1Block, bus_address: Address) -> Vec<InboundMessage> {
    block
        .transactions
        .iter()
        .filter(|tx| tx.to == bus_address)
        .filter_map(|tx| decode_message(&tx.payload))
        .collect()
}

/// Scans `block` for a rollup publication: an L1 transaction addressed to
/// `rollup_address` carrying a borsh-encoded [`L2Batch`] as its payload -
/// §4.2 step 3's "if the L1 block contains a rollup publication, fetch
/// the referenced batch and its full transaction list", with the batch
/// posted as L1 calldata standing in for a separate data-availability
/// fetch. At most one publication is applied per L1 block; a block is
/// not expected to carry more than one, and only the first match is
/// used. A malformed payload is skipped rather than failing the whole
/// block, matching `extract_inbound_messages`'s leniency.
pub fn extract_rollup_publication(block: &L1Block, rollup_address: Address) -> Option<L2Batch> {
    block
        .transactions
        .iter()
        .filter(|tx| tx.to == rollup_address)
        .find_map(|tx| borsh::from_slice(&tx.payload).ok())
}

fn decode_message(payload: &[u8]) -> Option<InboundMessage> {
    if payload.len() < HEADER_LEN {
        return None;
    }
    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&payload[..NONCE_LEN]);
    let mut sender_bytes = [0u8; SENDER_LEN];
    sender_bytes.copy_from_slice(&payload[NONCE_LEN..HEADER_LEN]);

    Some(InboundMessage {
        nonce: u64::from_be_bytes(nonce_bytes),
        sender: Address::new(sender_bytes),
        payload: payload[HEADER_LEN..].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use ten_l1_client::L1Tx;
    use ten_primitives::Hash32;

    use super::*;

    fn encode(nonce: u64, sender: Address, payload: &[u8]) -> Vec<u8> {
        let mut out = nonce.to_be_bytes().to_vec();
        out.extend_from_slice(sender.as_bytes());
        out.extend_from_slice(payload);
        out
    }

    fn block_with_txs(txs: Vec<L1Tx>) -> L1Block {
        L1Block {
            hash: Hash32::new([1; 32]),
            parent_hash: Hash32::ZERO,
            height: 1,
            timestamp: 1_000,
            transactions: txs,
        }
    }

    #[test]
    fn extracts_only_transactions_addressed_to_the_bus() {
        let bus = Address::new([0xBB; 20]);
        let sender = Address::new([0xAA; 20]);
        let block = block_with_txs(vec![
            L1Tx {
                to: bus,
                payload: encode(7, sender, b"hello"),
            },
            L1Tx {
                to: Address::new([0xCC; 20]),
                payload: encode(8, sender, b"ignored"),
            },
        ]);

        let messages = extract_inbound_messages(&block, bus);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].nonce, 7);
        assert_eq!(messages[0].sender, sender);
        assert_eq!(messages[0].payload, b"hello");
    }

    #[test]
    fn skips_malformed_payloads_without_failing_the_whole_block() {
        let bus = Address::new([0xBB; 20]);
        let sender = Address::new([0xAA; 20]);
        let block = block_with_txs(vec![
            L1Tx {
                to: bus,
                payload: vec![1, 2, 3], // too short to contain a header
            },
            L1Tx {
                to: bus,
                payload: encode(1, sender, b"ok"),
            },
        ]);

        let messages = extract_inbound_messages(&block, bus);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].payload, b"ok");
    }

    #[test]
    fn empty_block_yields_no_messages() {
        let block = block_with_txs(vec![]);
        assert!(extract_inbound_messages(&block, Address::ZERO).is_empty());
    }

    fn sample_batch(height: u64) -> ten_primitives::L2Batch {
        ten_primitives::L2Batch {
            header: ten_primitives::BatchHeader {
                parent_hash: Hash32::ZERO,
                height,
                state_root: Hash32::new([1; 32]),
                receipt_root: Hash32::ZERO,
                tx_root: Hash32::ZERO,
                producer: Address::ZERO,
                timestamp: 1_000,
                l1_proof: None,
            },
            txs: vec![ten_primitives::EncryptedL2Tx {
                hash: Hash32::new([2; 32]),
                envelope: vec![9, 9],
            }],
        }
    }

    #[test]
    fn finds_a_rollup_publication_addressed_to_the_rollup_contract() {
        let rollup_address = Address::new([0xDD; 20]);
        let batch = sample_batch(1);
        let block = block_with_txs(vec![L1Tx {
            to: rollup_address,
            payload: borsh::to_vec(&batch).unwrap(),
        }]);

        let found = extract_rollup_publication(&block, rollup_address);
        assert_eq!(found, Some(batch));
    }

    #[test]
    fn ignores_publications_not_addressed_to_the_rollup_contract() {
        let rollup_address = Address::new([0xDD; 20]);
        let batch = sample_batch(1);
        let block = block_with_txs(vec![L1Tx {
            to: Address::new([0xEE; 20]),
            payload: borsh::to_vec(&batch).unwrap(),
        }]);

        assert_eq!(extract_rollup_publication(&block, rollup_address), None);
    }

    #[test]
    fn skips_a_malformed_rollup_payload() {
        let rollup_address = Address::new([0xDD; 20]);
        let block = block_with_txs(vec![L1Tx {
            to: rollup_address,
            payload: vec![1, 2, 3],
        }]);

        assert_eq!(extract_rollup_publication(&block, rollup_address), None);
    }
}
