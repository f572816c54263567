//! Method classification and result coercion, spec.md §4.4: "the list of
//! sensitive methods is part of the protocol, not a client preference".

use serde_json::Value;

use crate::errors::RpcError;

/// Methods whose params and result travel end-to-end encrypted. Host and
/// enclave must agree on this exact set.
pub const SENSITIVE_METHODS: &[&str] = &[
    "eth_call",
    "eth_getBalance",
    "eth_getTransactionReceipt",
    "eth_sendRawTransaction",
    "eth_getTransactionByHash",
    "rpc_subscribe_logs",
    "rpc_add_viewing_key",
];

pub fn is_sensitive(method: &str) -> bool {
    SENSITIVE_METHODS.contains(&method)
}

/// The three result shapes a client may request, per spec.md §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// Treat the decrypted plaintext as raw bytes.
    Bytes,
    /// Attempt a JSON parse; on failure, fall back to a string.
    Untyped,
    /// JSON-parse into the caller's expected shape; a parse failure is an
    /// error, not a fallback.
    Typed,
}

pub fn coerce_result(plaintext: &[u8], shape: ResultShape) -> Result<Value, RpcError> {
    match shape {
        ResultShape::Bytes => Ok(Value::String(format!("0x{}", hex::encode(plaintext)))),
        ResultShape::Untyped => Ok(serde_json::from_slice(plaintext)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(plaintext).into_owned()))),
        ResultShape::Typed => serde_json::from_slice(plaintext)
            .map_err(|e| RpcError::Decode(format!("typed result parse failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_the_protocol_sensitive_set() {
        assert!(is_sensitive("eth_call"));
        assert!(is_sensitive("rpc_add_viewing_key"));
        assert!(!is_sensitive("eth_blockNumber"));
    }

    #[test]
    fn bytes_shape_hex_encodes_raw_plaintext() {
        let v = coerce_result(&[0xde, 0xad], ResultShape::Bytes).unwrap();
        assert_eq!(v, Value::String("0xdead".to_string()));
    }

    #[test]
    fn untyped_shape_falls_back_to_string_on_bad_json() {
        let v = coerce_result(b"not json", ResultShape::Untyped).unwrap();
        assert_eq!(v, Value::String("not json".to_string()));
    }

    #[test]
    fn untyped_shape_parses_valid_json() {
        let v = coerce_result(b"{\"a\":1}", ResultShape::Untyped).unwrap();
        assert_eq!(v, serde_json::json!({"a": 1}));
    }

    #[test]
    fn typed_shape_errors_on_bad_json() {
        assert!(coerce_result(b"not json", ResultShape::Typed).is_err());
    }
}
