//! The `#[rpc]` server trait and its implementation. Grounded on
//! `bin/strata/src/rpc/mod.rs`'s `RpcModule`/`ServerBuilder` merge pattern
//! and `bin/strata/src/rpc/node.rs`'s server-struct-wraps-handles shape.

use std::{str::FromStr, sync::Arc};

use jsonrpsee::{core::RpcResult, proc_macros::rpc, types::ErrorObjectOwned};
use secp256k1::{PublicKey, SecretKey};
use serde_json::Value;
use ten_crypto::SignatureType;
use ten_enclave::EnclaveCore;
use ten_executor::StateExecutor;
use ten_primitives::Address;
use ten_storage::KvStore;

use crate::{
    dispatch::SensitiveDispatcher,
    envelope,
    errors::{self, rpc_err},
};

/// Every sensitive method's wire `params` array holds exactly this one
/// element - the hex ECIES ciphertext over a JSON envelope - per spec.md
/// §4.4's "Wire shape". `account_address` travels inside the ciphertext
/// rather than as a second plaintext argument: a claimed address is never
/// trusted as authorization on its own (a forged claim just means the
/// enclave answers under *that* address's registered viewing key, which
/// the forger cannot decrypt).
#[rpc(server)]
pub trait TenRpcApi {
    #[method(name = "rpc_add_viewing_key")]
    async fn add_viewing_key(&self, ciphertext: String) -> RpcResult<()>;

    #[method(name = "eth_call")]
    async fn eth_call(&self, ciphertext: String) -> RpcResult<Option<String>>;

    #[method(name = "eth_getBalance")]
    async fn eth_get_balance(&self, ciphertext: String) -> RpcResult<Option<String>>;

    #[method(name = "eth_getTransactionReceipt")]
    async fn eth_get_transaction_receipt(&self, ciphertext: String) -> RpcResult<Option<String>>;

    #[method(name = "eth_sendRawTransaction")]
    async fn eth_send_raw_transaction(&self, ciphertext: String) -> RpcResult<Option<String>>;

    #[method(name = "eth_getTransactionByHash")]
    async fn eth_get_transaction_by_hash(&self, ciphertext: String) -> RpcResult<Option<String>>;

    #[method(name = "rpc_subscribe_logs")]
    async fn rpc_subscribe_logs(&self, ciphertext: String) -> RpcResult<Option<String>>;
}

/// Implements the envelope contract: decrypt params with the enclave's
/// secret key, hand the plaintext to a [`SensitiveDispatcher`], re-encrypt
/// the result under the caller's registered viewing key.
pub struct TenRpcServer<S: KvStore, E: StateExecutor, D: SensitiveDispatcher> {
    enclave: Arc<EnclaveCore<S, E>>,
    enclave_secret_key: SecretKey,
    dispatcher: Arc<D>,
}

impl<S, E, D> TenRpcServer<S, E, D>
where
    S: KvStore + 'static,
    E: StateExecutor + 'static,
    D: SensitiveDispatcher + 'static,
{
    pub fn new(enclave: Arc<EnclaveCore<S, E>>, enclave_secret_key: SecretKey, dispatcher: Arc<D>) -> Self {
        Self {
            enclave,
            enclave_secret_key,
            dispatcher,
        }
    }

    async fn handle_sensitive(&self, method: &str, ciphertext: String) -> RpcResult<Option<String>> {
        let envelope = envelope::unseal(&self.enclave_secret_key, &ciphertext).map_err(rpc_err)?;
        let (account, params) = split_envelope(envelope)?;

        // Invariant: a sensitive method must fail cleanly if no viewing key
        // has been registered for this account (spec.md §4.4).
        let viewing_key = self.enclave.viewing_keys().get(account).ok_or_else(errors::auth_error)?;

        let result = self
            .dispatcher
            .dispatch(method, params, account)
            .await
            .map_err(rpc_err)?;

        let Some(result) = result else {
            return Ok(None);
        };

        let recipient_pk = PublicKey::from_slice(&viewing_key.public_key).map_err(|e| {
            errors::decode_error(format!("stored viewing key is not a valid public key: {e}"))
        })?;
        let sealed = envelope::seal(&recipient_pk, &result).map_err(rpc_err)?;
        Ok(Some(sealed))
    }
}

#[jsonrpsee::core::async_trait]
impl<S, E, D> TenRpcApiServer for TenRpcServer<S, E, D>
where
    S: KvStore + 'static,
    E: StateExecutor + 'static,
    D: SensitiveDispatcher + 'static,
{
    async fn add_viewing_key(&self, ciphertext: String) -> RpcResult<()> {
        let envelope = envelope::unseal(&self.enclave_secret_key, &ciphertext).map_err(rpc_err)?;

        let account_address = envelope
            .get("account_address")
            .and_then(Value::as_str)
            .ok_or_else(|| errors::protocol_error("envelope is missing account_address"))?;
        let account = Address::from_str(account_address)
            .map_err(|e| errors::protocol_error(format!("invalid account address: {e}")))?;

        let signature_type = envelope
            .get("signature_type")
            .and_then(Value::as_str)
            .ok_or_else(|| errors::protocol_error("envelope is missing signature_type"))?;
        let sig_type = parse_signature_type(signature_type)?;

        let public_key_hex = envelope
            .get("public_key")
            .and_then(Value::as_str)
            .ok_or_else(|| errors::protocol_error("envelope is missing public_key"))?;
        let public_key = hex::decode(public_key_hex.strip_prefix("0x").unwrap_or(public_key_hex))
            .map_err(|e| errors::decode_error(format!("invalid hex public key: {e}")))?;

        let signature_hex = envelope
            .get("signature")
            .and_then(Value::as_str)
            .ok_or_else(|| errors::protocol_error("envelope is missing signature"))?;
        let signature_bytes = hex::decode(signature_hex.strip_prefix("0x").unwrap_or(signature_hex))
            .map_err(|e| errors::decode_error(format!("invalid hex signature: {e}")))?;

        self.enclave
            .viewing_keys()
            .register(public_key, signature_bytes, sig_type, account)
            .map_err(rpc_err)?;
        Ok(())
    }

    async fn eth_call(&self, ciphertext: String) -> RpcResult<Option<String>> {
        self.handle_sensitive("eth_call", ciphertext).await
    }

    async fn eth_get_balance(&self, ciphertext: String) -> RpcResult<Option<String>> {
        self.handle_sensitive("eth_getBalance", ciphertext).await
    }

    async fn eth_get_transaction_receipt(&self, ciphertext: String) -> RpcResult<Option<String>> {
        self.handle_sensitive("eth_getTransactionReceipt", ciphertext).await
    }

    async fn eth_send_raw_transaction(&self, ciphertext: String) -> RpcResult<Option<String>> {
        self.handle_sensitive("eth_sendRawTransaction", ciphertext).await
    }

    async fn eth_get_transaction_by_hash(&self, ciphertext: String) -> RpcResult<Option<String>> {
        self.handle_sensitive("eth_getTransactionByHash", ciphertext).await
    }

    async fn rpc_subscribe_logs(&self, ciphertext: String) -> RpcResult<Option<String>> {
        self.handle_sensitive("rpc_subscribe_logs", ciphertext).await
    }
}

fn parse_signature_type(s: &str) -> Result<SignatureType, ErrorObjectOwned> {
    match s {
        "PersonalSign" => Ok(SignatureType::PersonalSign),
        "EIP712" => Ok(SignatureType::Eip712),
        "TypedDataV4" => Ok(SignatureType::TypedDataV4),
        other => Err(errors::protocol_error(format!("unknown signature type: {other}"))),
    }
}

/// Splits a decrypted sensitive-call envelope `{ "account_address", "params" }`
/// into the claimed account and the inner params value the dispatcher
/// expects. The claim is not itself an authorization: it only selects
/// which registered viewing key re-encrypts the response, so a forged
/// address just means the forger cannot read the answer.
fn split_envelope(envelope: Value) -> RpcResult<(Address, Value)> {
    let account_address = envelope
        .get("account_address")
        .and_then(Value::as_str)
        .ok_or_else(|| errors::protocol_error("envelope is missing account_address"))?;
    let account = Address::from_str(account_address)
        .map_err(|e| errors::protocol_error(format!("invalid account address: {e}")))?;
    let params = envelope.get("params").cloned().unwrap_or(Value::Null);
    Ok((account, params))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use secp256k1::{ecdsa::RecoverableSignature, Message, Secp256k1};
    use serde_json::{json, Value};
    use ten_executor::ReferenceExecutor;
    use ten_primitives::Hash32;
    use ten_storage::MemStore;

    use super::*;

    struct EchoDispatcher;

    #[async_trait]
    impl SensitiveDispatcher for EchoDispatcher {
        async fn dispatch(
            &self,
            _method: &str,
            params: Value,
            _account: Address,
        ) -> Result<Option<Value>, crate::errors::RpcError> {
            Ok(Some(params))
        }
    }

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

    fn sign_personal(owner_sk: &SecretKey, public_key: &[u8]) -> Vec<u8> {
        let message = format!("Register {}", hex::encode(public_key));
        let prefixed = format!("\x19Ethereum Signed Message:\n{}{}", message.len(), message);
        let digest = ten_crypto::keccak256(prefixed.as_bytes());

        let secp = Secp256k1::new();
        let msg = Message::from_digest(digest);
        let sig: RecoverableSignature = secp.sign_ecdsa_recoverable(&msg, owner_sk);
        let (recid, rs) = sig.serialize_compact();
        let mut out = rs.to_vec();
        out.push(recid.to_i32() as u8);
        out
    }

    fn address_of(owner_sk: &SecretKey) -> Address {
        let secp = Secp256k1::new();
        let pk = PublicKey::from_secret_key(&secp, owner_sk);
        let uncompressed = pk.serialize_uncompressed();
        let hash = ten_crypto::keccak256(&uncompressed[1..]);
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&hash[12..]);
        Address::new(addr)
    }

    #[tokio::test]
    async fn sensitive_call_fails_cleanly_with_no_registered_viewing_key() {
        let secp = Secp256k1::new();
        let enclave_sk = SecretKey::new(&mut rand::thread_rng());
        let enclave_pk = PublicKey::from_secret_key(&secp, &enclave_sk);
        let server = TenRpcServer::new(new_enclave(), enclave_sk, Arc::new(EchoDispatcher));

        let envelope = json!({"account_address": Address::new([0x42; 20]).to_string(), "params": {}});
        let ciphertext = envelope::seal(&enclave_pk, &envelope).unwrap();

        let result = server.eth_call(ciphertext).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn sensitive_call_round_trips_after_viewing_key_registration() {
        let secp = Secp256k1::new();
        let enclave_sk = SecretKey::new(&mut rand::thread_rng());
        let enclave_pk = PublicKey::from_secret_key(&secp, &enclave_sk);

        let owner_sk = SecretKey::new(&mut rand::thread_rng());
        let account = address_of(&owner_sk);

        let viewing_sk = SecretKey::new(&mut rand::thread_rng());
        let viewing_pk = PublicKey::from_secret_key(&secp, &viewing_sk);
        let viewing_pk_bytes = viewing_pk.serialize().to_vec();

        let signature = sign_personal(&owner_sk, &viewing_pk_bytes);

        let server = TenRpcServer::new(new_enclave(), enclave_sk, Arc::new(EchoDispatcher));

        let registration = json!({
            "public_key": format!("0x{}", hex::encode(&viewing_pk_bytes)),
            "signature": format!("0x{}", hex::encode(signature)),
            "signature_type": "PersonalSign",
            "account_address": account.to_string(),
        });
        let registration_ciphertext = envelope::seal(&enclave_pk, &registration).unwrap();
        server.add_viewing_key(registration_ciphertext).await.unwrap();

        let params = json!({"hello": "world"});
        let envelope = json!({"account_address": account.to_string(), "params": params});
        let ciphertext = envelope::seal(&enclave_pk, &envelope).unwrap();

        let sealed_result = server
            .eth_call(ciphertext)
            .await
            .unwrap()
            .expect("dispatcher always returns Some");

        let opened = envelope::unseal(&viewing_sk, &sealed_result).unwrap();
        assert_eq!(opened, params);
    }
}
