//! Client-side encrypting wrapper, grounded on
//! `original_source/go/rpc/encrypted_client.go`: encrypts sensitive params
//! to the enclave's public key, decrypts sensitive results with the
//! caller's own viewing key, and drives `rpc_add_viewing_key`
//! registration.

use jsonrpsee::{core::client::ClientT, http_client::HttpClient, rpc_params};
use secp256k1::{PublicKey, SecretKey};
use serde_json::{json, Value};

use crate::{
    envelope,
    errors::RpcError,
    methods::{coerce_result, ResultShape},
};

pub struct EncryptedRpcClient {
    inner: HttpClient,
    enclave_public_key: PublicKey,
}

impl EncryptedRpcClient {
    pub fn new(inner: HttpClient, enclave_public_key: PublicKey) -> Self {
        Self {
            inner,
            enclave_public_key,
        }
    }

    pub async fn register_viewing_key(
        &self,
        viewing_public_key: &[u8],
        signature: &[u8],
        signature_type: &str,
        account_address: &str,
    ) -> Result<(), RpcError> {
        let registration = json!({
            "public_key": format!("0x{}", hex::encode(viewing_public_key)),
            "signature": format!("0x{}", hex::encode(signature)),
            "signature_type": signature_type,
            "account_address": account_address,
        });
        let ciphertext = envelope::seal(&self.enclave_public_key, &registration)?;

        self.inner
            .request::<(), _>("rpc_add_viewing_key", rpc_params![ciphertext])
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))
    }

    /// Calls a sensitive method, encrypting `{account_address, params}` to
    /// the enclave as the sole wire argument, and decrypting the result
    /// (if any) with `viewing_secret_key`.
    pub async fn call_sensitive(
        &self,
        method: &str,
        account_address: &str,
        viewing_secret_key: &SecretKey,
        params: &Value,
        shape: ResultShape,
    ) -> Result<Option<Value>, RpcError> {
        let envelope = json!({"account_address": account_address, "params": params});
        let ciphertext = envelope::seal(&self.enclave_public_key, &envelope)?;

        let sealed_result: Option<String> = self
            .inner
            .request(method, rpc_params![ciphertext])
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let Some(sealed_result) = sealed_result else {
            return Ok(None);
        };

        let plaintext = envelope::unseal_bytes(viewing_secret_key, &sealed_result)?;
        coerce_result(&plaintext, shape).map(Some)
    }
}
