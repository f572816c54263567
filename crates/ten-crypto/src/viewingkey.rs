//! Verifies that an account address authorised a viewing-key public key, per
//! the scheme the client claims to have used.

use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId},
    Message, Secp256k1,
};
use serde::{Deserialize, Serialize};
use ten_primitives::Address;
use thiserror::Error;

use crate::keccak256;

/// The wallet signature scheme used to authorise a viewing key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignatureType {
    PersonalSign,
    Eip712,
    TypedDataV4,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewingKeyError {
    #[error("signature must be 65 bytes (r || s || v), got {0}")]
    BadSignatureLength(usize),
    #[error("invalid recovery id {0}")]
    BadRecoveryId(u8),
    #[error("malformed signature")]
    MalformedSignature,
    #[error("recovered address does not match the claimed account")]
    AddressMismatch,
}

/// Builds the digest that was signed to authorise `public_key`, per the
/// claimed [`SignatureType`]. `PersonalSign` uses the standard EIP-191
/// `"\x19Ethereum Signed Message:\n" + len` prefix over the hex-encoded
/// public key; the EIP-712 variants hash a minimal typed-data structure
/// binding the same public key, so all three schemes ultimately authorise
/// the identical payload through different wallet UX flows.
fn signing_digest(sig_type: SignatureType, public_key: &[u8]) -> [u8; 32] {
    let message = format!("Register {}", hex::encode(public_key));
    match sig_type {
        SignatureType::PersonalSign => {
            let prefixed = format!("\x19Ethereum Signed Message:\n{}{}", message.len(), message);
            keccak256(prefixed.as_bytes())
        }
        SignatureType::Eip712 | SignatureType::TypedDataV4 => {
            // Minimal stand-in for a full EIP-712 domain/type hash: bind the
            // scheme name and message into one digest so the two typed-data
            // variants are not interchangeable with PersonalSign.
            let mut buf = Vec::with_capacity(64);
            buf.extend_from_slice(b"ten-viewing-key-typed-data");
            buf.extend_from_slice(message.as_bytes());
            keccak256(&buf)
        }
    }
}

/// Recovers the Ethereum-style address that produced `signature` over
/// `digest`. `signature` is the standard 65-byte `r || s || v` encoding.
pub fn recover_address(digest: [u8; 32], signature: &[u8]) -> Result<Address, ViewingKeyError> {
    if signature.len() != 65 {
        return Err(ViewingKeyError::BadSignatureLength(signature.len()));
    }
    let (rs, v) = signature.split_at(64);
    let recovery_byte = v[0];
    // Accept both the raw {0,1} and the Ethereum-adjusted {27,28} encodings.
    let normalized = if recovery_byte >= 27 {
        recovery_byte - 27
    } else {
        recovery_byte
    };
    let recovery_id =
        RecoveryId::from_i32(normalized as i32).map_err(|_| ViewingKeyError::BadRecoveryId(v[0]))?;

    let recoverable = RecoverableSignature::from_compact(rs, recovery_id)
        .map_err(|_| ViewingKeyError::MalformedSignature)?;

    let secp = Secp256k1::new();
    let message = Message::from_digest(digest);
    let pubkey = secp
        .recover_ecdsa(&message, &recoverable)
        .map_err(|_| ViewingKeyError::MalformedSignature)?;

    let uncompressed = pubkey.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]); // drop the 0x04 prefix
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..]);
    Ok(Address::new(addr))
}

/// Verifies that `signature` over `public_key`'s registration message was
/// produced by `claimed_address`, per the declared [`SignatureType`].
pub fn verify_viewing_key_signature(
    public_key: &[u8],
    signature: &[u8],
    sig_type: SignatureType,
    claimed_address: Address,
) -> Result<(), ViewingKeyError> {
    let digest = signing_digest(sig_type, public_key);
    let recovered = recover_address(digest, signature)?;
    if recovered != claimed_address {
        return Err(ViewingKeyError::AddressMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use secp256k1::{ecdsa::RecoverableSignature, Secp256k1, SecretKey};

    use super::*;

    fn sign(sk: &SecretKey, digest: [u8; 32]) -> Vec<u8> {
        let secp = Secp256k1::new();
        let message = Message::from_digest(digest);
        let sig: RecoverableSignature = secp.sign_ecdsa_recoverable(&message, sk);
        let (recid, rs) = sig.serialize_compact();
        let mut out = rs.to_vec();
        out.push(recid.to_i32() as u8);
        out
    }

    fn address_of(sk: &SecretKey) -> Address {
        let secp = Secp256k1::new();
        let pk = secp256k1::PublicKey::from_secret_key(&secp, sk);
        let uncompressed = pk.serialize_uncompressed();
        let hash = keccak256(&uncompressed[1..]);
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&hash[12..]);
        Address::new(addr)
    }

    #[test]
    fn accepts_valid_personal_sign() {
        let sk = SecretKey::new(&mut rand::thread_rng());
        let addr = address_of(&sk);
        let vk_public_key = b"fake-viewing-key-pubkey";

        let digest = signing_digest(SignatureType::PersonalSign, vk_public_key);
        let sig = sign(&sk, digest);

        assert!(verify_viewing_key_signature(
            vk_public_key,
            &sig,
            SignatureType::PersonalSign,
            addr
        )
        .is_ok());
    }

    #[test]
    fn rejects_signature_from_a_different_account() {
        let sk = SecretKey::new(&mut rand::thread_rng());
        let other_addr = Address::new([0xAB; 20]);
        let vk_public_key = b"fake-viewing-key-pubkey";

        let digest = signing_digest(SignatureType::PersonalSign, vk_public_key);
        let sig = sign(&sk, digest);

        assert_eq!(
            verify_viewing_key_signature(
                vk_public_key,
                &sig,
                SignatureType::PersonalSign,
                other_addr
            ),
            Err(ViewingKeyError::AddressMismatch)
        );
    }

    #[test]
    fn rejects_short_signature() {
        assert_eq!(
            recover_address([0u8; 32], &[1, 2, 3]),
            Err(ViewingKeyError::BadSignatureLength(3))
        );
    }

    #[test]
    fn typed_data_schemes_are_not_interchangeable_with_personal_sign() {
        let sk = SecretKey::new(&mut rand::thread_rng());
        let addr = address_of(&sk);
        let vk_public_key = b"fake-viewing-key-pubkey";

        let digest = signing_digest(SignatureType::Eip712, vk_public_key);
        let sig = sign(&sk, digest);

        assert_eq!(
            verify_viewing_key_signature(vk_public_key, &sig, SignatureType::PersonalSign, addr),
            Err(ViewingKeyError::AddressMismatch)
        );
    }
}
