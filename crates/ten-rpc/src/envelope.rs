//! The wire-level envelope: a sensitive request's single `params` element
//! is the hex-encoded ECIES ciphertext over the JSON-encoded original
//! params, and the response `result` is hex-ciphertext the same way.
//! Grounded on `original_source/go/rpc/encrypted_client.go`'s role and
//! `ten_crypto::ecies` for the cipher itself.

use secp256k1::{PublicKey, SecretKey};
use serde_json::Value;

use crate::errors::RpcError;

/// Encrypts a JSON value to `recipient`, returning the hex string that
/// goes on the wire as the sole `params` (or `result`) element.
pub fn seal(recipient: &PublicKey, value: &Value) -> Result<String, RpcError> {
    let plaintext =
        serde_json::to_vec(value).map_err(|e| RpcError::Decode(format!("encode before seal: {e}")))?;
    let ciphertext = ten_crypto::encrypt(recipient, &plaintext)
        .map_err(|e| RpcError::Internal(format!("ecies encrypt: {e}")))?;
    Ok(format!("0x{}", hex::encode(ciphertext)))
}

/// Decrypts a hex-ciphertext wire element with `recipient_key` and parses
/// the plaintext as JSON.
pub fn unseal(recipient_key: &SecretKey, hex_ciphertext: &str) -> Result<Value, RpcError> {
    let bytes = decode_hex(hex_ciphertext)?;
    let plaintext = ten_crypto::decrypt(recipient_key, &bytes)
        .map_err(|e| RpcError::Decode(format!("ecies decrypt: {e}")))?;
    serde_json::from_slice(&plaintext).map_err(|e| RpcError::Decode(format!("envelope payload is not JSON: {e}")))
}

/// Like [`unseal`] but returns the raw decrypted bytes instead of parsing
/// them as JSON - used by [`crate::methods::coerce_result`], which applies
/// its own byte/untyped/typed interpretation.
pub fn unseal_bytes(recipient_key: &SecretKey, hex_ciphertext: &str) -> Result<Vec<u8>, RpcError> {
    let bytes = decode_hex(hex_ciphertext)?;
    ten_crypto::decrypt(recipient_key, &bytes).map_err(|e| RpcError::Decode(format!("ecies decrypt: {e}")))
}

fn decode_hex(s: &str) -> Result<Vec<u8>, RpcError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(stripped).map_err(|e| RpcError::Decode(format!("invalid hex envelope: {e}")))
}

#[cfg(test)]
mod tests {
    use secp256k1::{Secp256k1, SecretKey};
    use serde_json::json;

    use super::*;

    #[test]
    fn seal_then_unseal_round_trips_the_value() {
        let secp = Secp256k1::new();
        let sk = SecretKey::new(&mut rand::thread_rng());
        let pk = PublicKey::from_secret_key(&secp, &sk);

        let value = json!({"to": "0x1111111111111111111111111111111111111111"});
        let sealed = seal(&pk, &value).unwrap();
        let opened = unseal(&sk, &sealed).unwrap();
        assert_eq!(opened, value);
    }

    #[test]
    fn malformed_hex_is_a_decode_error() {
        let sk = SecretKey::new(&mut rand::thread_rng());
        assert!(matches!(unseal(&sk, "0xzz"), Err(RpcError::Decode(_))));
    }
}
