//! The viewing-key registry: C6's side of the confidential RPC contract.
//! Registration verifies the wallet signature before admitting a key;
//! lookup backs C7's response-encryption path. spec.md §4.2/4.6's
//! eviction policy is explicitly out of scope, so entries live for the
//! enclave's lifetime.

use parking_lot::RwLock;
use std::collections::HashMap;
use ten_crypto::{verify_viewing_key_signature, SignatureType};
use ten_primitives::Address;

use crate::errors::EnclaveError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewingKey {
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
    pub signature_type: SignatureType,
    pub account_address: Address,
}

#[derive(Default)]
pub struct ViewingKeyRegistry {
    keys: RwLock<HashMap<Address, ViewingKey>>,
}

impl ViewingKeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verifies `signature` authorises `public_key` on behalf of
    /// `account_address`, then registers it. Rejects with `auth_error` on
    /// a bad signature, per spec.md §7 - no partial registration.
    pub fn register(
        &self,
        public_key: Vec<u8>,
        signature: Vec<u8>,
        signature_type: SignatureType,
        account_address: Address,
    ) -> Result<(), EnclaveError> {
        verify_viewing_key_signature(&public_key, &signature, signature_type, account_address)
            .map_err(|err| EnclaveError::Auth(err.to_string()))?;

        self.keys.write().insert(
            account_address,
            ViewingKey {
                public_key,
                signature,
                signature_type,
                account_address,
            },
        );
        Ok(())
    }

    pub fn get(&self, account_address: Address) -> Option<ViewingKey> {
        self.keys.read().get(&account_address).cloned()
    }

    pub fn contains(&self, account_address: Address) -> bool {
        self.keys.read().contains_key(&account_address)
    }
}

#[cfg(test)]
mod tests {
    use secp256k1::{ecdsa::RecoverableSignature, Message, Secp256k1, SecretKey};
    use ten_crypto::keccak256;

    use super::*;

    fn sign_personal(sk: &SecretKey, public_key: &[u8]) -> Vec<u8> {
        let message = format!("Register {}", hex::encode(public_key));
        let prefixed = format!("\x19Ethereum Signed Message:\n{}{}", message.len(), message);
        let digest = keccak256(prefixed.as_bytes());

        let secp = Secp256k1::new();
        let msg = Message::from_digest(digest);
        let sig: RecoverableSignature = secp.sign_ecdsa_recoverable(&msg, sk);
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
    fn registers_a_validly_signed_key() {
        let registry = ViewingKeyRegistry::new();
        let sk = SecretKey::new(&mut rand::thread_rng());
        let addr = address_of(&sk);
        let public_key = b"vk-pubkey".to_vec();
        let signature = sign_personal(&sk, &public_key);

        registry
            .register(public_key, signature, SignatureType::PersonalSign, addr)
            .unwrap();
        assert!(registry.contains(addr));
    }

    #[test]
    fn rejects_a_key_signed_by_someone_else() {
        let registry = ViewingKeyRegistry::new();
        let sk = SecretKey::new(&mut rand::thread_rng());
        let public_key = b"vk-pubkey".to_vec();
        let signature = sign_personal(&sk, &public_key);
        let other_addr = Address::new([0x42; 20]);

        let result = registry.register(public_key, signature, SignatureType::PersonalSign, other_addr);
        assert!(matches!(result, Err(EnclaveError::Auth(_))));
        assert!(!registry.contains(other_addr));
    }
}
