//! Wires [`ten_rpc::SensitiveDispatcher`] to the enclave core. The only
//! sensitive method with a real state-mutating effect is
//! `eth_sendRawTransaction` (admits into the mempool); the read methods
//! have no query engine to answer from - `ten-executor`'s `StateExecutor`
//! is write-only by design (§1 non-goal: not EVM-equivalent) - so they
//! degrade to "not found" the way Ethereum clients answer an unknown
//! hash with `null` rather than an error.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};
use ten_enclave::EnclaveCore;
use ten_executor::StateExecutor;
use ten_filters::parse_filter_criteria;
use ten_primitives::{Address, EncryptedL2Tx, Hash32};
use ten_rpc::{RpcError, SensitiveDispatcher};
use ten_storage::KvStore;

pub struct EnclaveDispatcher<S: KvStore, E: StateExecutor> {
    enclave: Arc<EnclaveCore<S, E>>,
}

impl<S: KvStore, E: StateExecutor> EnclaveDispatcher<S, E> {
    pub fn new(enclave: Arc<EnclaveCore<S, E>>) -> Self {
        Self { enclave }
    }
}

#[async_trait]
impl<S, E> SensitiveDispatcher for EnclaveDispatcher<S, E>
where
    S: KvStore + 'static,
    E: StateExecutor + 'static,
{
    async fn dispatch(&self, method: &str, params: Value, account: Address) -> Result<Option<Value>, RpcError> {
        match method {
            "rpc_subscribe_logs" => {
                let items = params
                    .as_array()
                    .ok_or_else(|| RpcError::Protocol("rpc_subscribe_logs expects [subscription_type, filter?]".to_string()))?;
                let filter_value = items.get(1).cloned().unwrap_or(Value::Null);
                let filter = parse_filter_criteria(&filter_value)
                    .map_err(|e| RpcError::Protocol(format!("invalid filter: {e}")))?;

                // `handle_sensitive` only reaches a dispatcher after
                // confirming the caller has a registered viewing key, so
                // this lookup cannot miss in practice.
                let viewing_key = self
                    .enclave
                    .viewing_keys()
                    .get(account)
                    .ok_or_else(|| RpcError::Internal("subscribing account has no registered viewing key".to_string()))?;

                self.enclave.subscriptions().subscribe(viewing_key, filter);
                Ok(Some(Value::String(account.to_string())))
            }
            "eth_sendRawTransaction" => {
                let envelope_hex = params
                    .as_str()
                    .ok_or_else(|| RpcError::Protocol("eth_sendRawTransaction expects a hex string".to_string()))?;
                let envelope = hex::decode(envelope_hex.strip_prefix("0x").unwrap_or(envelope_hex))
                    .map_err(|e| RpcError::Decode(format!("invalid raw tx hex: {e}")))?;

                let mut hasher = Sha256::new();
                hasher.update(&envelope);
                let mut hash_bytes = [0u8; 32];
                hash_bytes.copy_from_slice(&hasher.finalize());
                let hash = Hash32::new(hash_bytes);

                self.enclave.mempool().admit(EncryptedL2Tx { hash, envelope });
                Ok(Some(Value::String(hash.to_string())))
            }
            "eth_call" | "eth_getBalance" | "eth_getTransactionReceipt" | "eth_getTransactionByHash" => Ok(None),
            other => Err(RpcError::Protocol(format!("unsupported sensitive method: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use ten_crypto::SignatureType;
    use ten_executor::ReferenceExecutor;
    use ten_primitives::Hash32;
    use ten_storage::MemStore;

    use super::*;

    fn new_enclave() -> Arc<EnclaveCore<MemStore, ReferenceExecutor>> {
        Arc::new(EnclaveCore::new(
            MemStore::new(),
            ReferenceExecutor,
            Address::new([0xAA; 20]),
            Address::new([0xBB; 20]),
            Hash32::new([1; 32]),
            Hash32::ZERO,
        ))
    }

    #[tokio::test]
    async fn raw_tx_is_admitted_and_hashed() {
        let enclave = new_enclave();
        let dispatcher = EnclaveDispatcher::new(enclave.clone());

        let result = dispatcher
            .dispatch(
                "eth_sendRawTransaction",
                Value::String("0x010203".to_string()),
                Address::new([0x01; 20]),
            )
            .await
            .unwrap();
        let hash: Hash32 = result.unwrap().as_str().unwrap().parse().unwrap();
        assert!(enclave.mempool().contains(hash));
    }

    #[tokio::test]
    async fn subscribing_without_a_registered_viewing_key_is_an_internal_error() {
        let enclave = new_enclave();
        let dispatcher = EnclaveDispatcher::new(enclave);

        let result = dispatcher
            .dispatch(
                "rpc_subscribe_logs",
                serde_json::json!(["logs", serde_json::Value::Null]),
                Address::new([0x02; 20]),
            )
            .await;
        assert!(matches!(result, Err(RpcError::Internal(_))));
    }

    #[tokio::test]
    async fn subscribing_with_a_registered_viewing_key_stores_the_filter() {
        use secp256k1::{ecdsa::RecoverableSignature, Message, Secp256k1, SecretKey};

        let enclave = new_enclave();
        let secp = Secp256k1::new();
        let owner_sk = SecretKey::new(&mut rand::thread_rng());
        let owner_pk = secp256k1::PublicKey::from_secret_key(&secp, &owner_sk);
        let account_hash = ten_crypto::keccak256(&owner_pk.serialize_uncompressed()[1..]);
        let mut account_bytes = [0u8; 20];
        account_bytes.copy_from_slice(&account_hash[12..]);
        let account = Address::new(account_bytes);

        let public_key = b"viewing-key-pubkey".to_vec();
        let message = format!("Register {}", hex::encode(&public_key));
        let prefixed = format!("\x19Ethereum Signed Message:\n{}{}", message.len(), message);
        let digest = ten_crypto::keccak256(prefixed.as_bytes());
        let msg = Message::from_digest(digest);
        let sig: RecoverableSignature = secp.sign_ecdsa_recoverable(&msg, &owner_sk);
        let (recid, rs) = sig.serialize_compact();
        let mut signature = rs.to_vec();
        signature.push(recid.to_i32() as u8);

        enclave
            .viewing_keys()
            .register(public_key, signature, SignatureType::PersonalSign, account)
            .unwrap();

        let dispatcher = EnclaveDispatcher::new(enclave.clone());
        let result = dispatcher
            .dispatch(
                "rpc_subscribe_logs",
                serde_json::json!(["logs", serde_json::Value::Null]),
                account,
            )
            .await
            .unwrap();
        assert_eq!(result.unwrap(), Value::String(account.to_string()));
        assert!(enclave.subscriptions().get(account).is_some());
    }
}
