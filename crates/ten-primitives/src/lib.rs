//! Shared primitive types: hashes, addresses, and hex codecs used across the
//! enclave and host crates.

mod address;
mod batch;
mod hash;

pub use address::Address;
pub use batch::{BatchHeader, EncryptedL2Tx, L2Batch};
pub use hash::Hash32;

/// 32-byte L1 block identifier.
pub type L1BlockId = Hash32;
/// 32-byte L2 batch-header hash.
pub type L2BatchHash = Hash32;
/// 32-byte transaction hash.
pub type TxHash = Hash32;
/// 32-byte Merkle state root.
pub type StateRoot = Hash32;

/// Error decoding a hex-encoded fixed-size byte array.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HexDecodeError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}

/// Decodes a `0x`-prefixed (or bare) hex string into a fixed-size array.
pub fn decode_hex_fixed<const N: usize>(s: &str) -> Result<[u8; N], HexDecodeError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s)?;
    if bytes.len() != N {
        return Err(HexDecodeError::WrongLength {
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}
