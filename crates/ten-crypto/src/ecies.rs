//! ECIES: encrypt to a secp256k1 public key, decrypt with the matching
//! private key. Used both directions of the confidential RPC envelope - the
//! client encrypts requests to the enclave's public key, the enclave
//! encrypts responses to the caller's viewing-key public key.
//!
//! Construction mirrors go-ethereum's `crypto/ecies` package: an ephemeral
//! keypair, ECDH against the recipient's public key, HKDF-SHA256 to derive
//! an AES key and a MAC key, AES-128-CTR for confidentiality, HMAC-SHA256
//! for integrity.

use aes::{cipher::KeyIvInit, Aes128};
use ctr::cipher::StreamCipher;
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use rand::RngCore;
use secp256k1::{ecdh::SharedSecret, PublicKey, Secp256k1, SecretKey};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type HmacSha256 = Hmac<Sha256>;

const IV_LEN: usize = 16;
const TAG_LEN: usize = 32;
const EPHEMERAL_PUBKEY_LEN: usize = 33; // compressed

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("ciphertext too short to contain an ECIES envelope")]
    Truncated,
    #[error("invalid public key")]
    InvalidPublicKey,
    #[error("MAC verification failed")]
    BadMac,
    #[error("secp256k1 error: {0}")]
    Secp256k1(#[from] secp256k1::Error),
}

fn derive_keys(shared: &SharedSecret) -> ([u8; 16], [u8; 32]) {
    let hk = Hkdf::<Sha256>::new(None, shared.as_ref());
    let mut okm = [0u8; 48];
    hk.expand(b"ten-ecies", &mut okm)
        .expect("48 bytes is a valid HKDF-SHA256 output length");
    let mut enc_key = [0u8; 16];
    let mut mac_key = [0u8; 32];
    enc_key.copy_from_slice(&okm[..16]);
    mac_key.copy_from_slice(&okm[16..]);
    (enc_key, mac_key)
}

fn compute_tag(mac_key: &[u8; 32], iv: &[u8], ciphertext: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(mac_key).expect("HMAC accepts any key length");
    mac.update(iv);
    mac.update(ciphertext);
    mac.finalize().into_bytes().into()
}

/// Encrypts `plaintext` so that only the holder of `recipient`'s private key
/// can recover it. Output layout: `ephemeral_pubkey(33) || iv(16) ||
/// ciphertext || tag(32)`.
pub fn encrypt(recipient: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let secp = Secp256k1::new();
    let mut rng = rand::thread_rng();

    let ephemeral_sk = SecretKey::new(&mut rng);
    let ephemeral_pk = PublicKey::from_secret_key(&secp, &ephemeral_sk);

    let shared = SharedSecret::new(recipient, &ephemeral_sk);
    let (enc_key, mac_key) = derive_keys(&shared);

    let mut iv = [0u8; IV_LEN];
    rng.fill_bytes(&mut iv);

    let mut ciphertext = plaintext.to_vec();
    let mut cipher = Aes128Ctr::new((&enc_key).into(), (&iv).into());
    cipher.apply_keystream(&mut ciphertext);

    let tag = compute_tag(&mac_key, &iv, &ciphertext);

    let mut out = Vec::with_capacity(EPHEMERAL_PUBKEY_LEN + IV_LEN + ciphertext.len() + TAG_LEN);
    out.extend_from_slice(&ephemeral_pk.serialize());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&ciphertext);
    out.extend_from_slice(&tag);
    Ok(out)
}

/// Decrypts an ECIES envelope produced by [`encrypt`] using the recipient's
/// private key.
pub fn decrypt(recipient_key: &SecretKey, envelope: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if envelope.len() < EPHEMERAL_PUBKEY_LEN + IV_LEN + TAG_LEN {
        return Err(CryptoError::Truncated);
    }

    let (ephemeral_pk_bytes, rest) = envelope.split_at(EPHEMERAL_PUBKEY_LEN);
    let (iv, rest) = rest.split_at(IV_LEN);
    let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);

    let ephemeral_pk =
        PublicKey::from_slice(ephemeral_pk_bytes).map_err(|_| CryptoError::InvalidPublicKey)?;

    let shared = SharedSecret::new(&ephemeral_pk, recipient_key);
    let (enc_key, mac_key) = derive_keys(&shared);

    let expected_tag = compute_tag(&mac_key, iv, ciphertext);
    if expected_tag.ct_eq(tag).unwrap_u8() != 1 {
        return Err(CryptoError::BadMac);
    }

    let mut plaintext = ciphertext.to_vec();
    let mut cipher = Aes128Ctr::new((&enc_key).into(), iv.into());
    cipher.apply_keystream(&mut plaintext);
    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use secp256k1::{Secp256k1, SecretKey};

    use super::*;

    #[test]
    fn round_trips_plaintext() {
        let secp = Secp256k1::new();
        let sk = SecretKey::new(&mut rand::thread_rng());
        let pk = PublicKey::from_secret_key(&secp, &sk);

        let msg = b"{\"method\":\"eth_getBalance\"}";
        let ct = encrypt(&pk, msg).unwrap();
        let pt = decrypt(&sk, &ct).unwrap();
        assert_eq!(pt, msg);
    }

    #[test]
    fn rejects_tampered_ciphertext() {
        let secp = Secp256k1::new();
        let sk = SecretKey::new(&mut rand::thread_rng());
        let pk = PublicKey::from_secret_key(&secp, &sk);

        let mut ct = encrypt(&pk, b"hello").unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0xff;
        assert_eq!(decrypt(&sk, &ct), Err(CryptoError::BadMac));
    }

    #[test]
    fn rejects_truncated_envelope() {
        assert_eq!(
            decrypt(&SecretKey::new(&mut rand::thread_rng()), &[1, 2, 3]),
            Err(CryptoError::Truncated)
        );
    }

    #[test]
    fn different_recipients_cannot_decrypt_each_others_messages() {
        let secp = Secp256k1::new();
        let sk_a = SecretKey::new(&mut rand::thread_rng());
        let pk_a = PublicKey::from_secret_key(&secp, &sk_a);
        let sk_b = SecretKey::new(&mut rand::thread_rng());

        let ct = encrypt(&pk_a, b"secret").unwrap();
        assert!(decrypt(&sk_b, &ct).is_err());
    }
}
