//! Cryptographic primitives for the confidential RPC envelope: ECIES
//! encryption between clients and the enclave, and Ethereum-style signature
//! verification backing viewing-key registration.

pub mod ecies;
pub mod viewingkey;

pub use ecies::{decrypt, encrypt, CryptoError};
pub use viewingkey::{recover_address, verify_viewing_key_signature, SignatureType, ViewingKeyError};

/// Keccak-256, the hash Ethereum uses for addresses and EIP-191/712 digests.
/// Distinct from SHA3-256 (different padding constant) - callers that need
/// Ethereum-compatible hashing must use this, not `sha3::Sha3_256`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    use sha3::{Digest, Keccak256};
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
