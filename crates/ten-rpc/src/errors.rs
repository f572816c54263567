//! Maps the enclave/filter error taxonomy onto JSON-RPC error objects.
//! Grounded on `bin/strata/src/rpc/errors.rs`'s `db_error`/`not_found_error`/
//! `internal_error`/`invalid_params_error` helper-function style, extended
//! with the `auth_error`/`protocol_error` pair spec.md §7 requires.

use jsonrpsee::types::{
    error::{INTERNAL_ERROR_CODE, INVALID_PARAMS_CODE},
    ErrorObjectOwned,
};
use ten_enclave::EnclaveError;
use ten_filters::FilterError;
use thiserror::Error;

const NOT_FOUND_CODE: i32 = -32001;
const DECODE_ERROR_CODE: i32 = -32002;
const CONSISTENCY_ERROR_CODE: i32 = -32003;
const TRANSPORT_ERROR_CODE: i32 = -32004;
const AUTH_ERROR_CODE: i32 = -32005;
const PROTOCOL_ERROR_CODE: i32 = -32006;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("not found")]
    NotFound,
    #[error("decode error: {0}")]
    Decode(String),
    #[error("consistency error: {0}")]
    Consistency(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("auth error")]
    Auth,
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<EnclaveError> for RpcError {
    fn from(err: EnclaveError) -> Self {
        match err {
            EnclaveError::NotFound => Self::NotFound,
            EnclaveError::Decode(msg) => Self::Decode(msg),
            EnclaveError::Consistency(msg) => Self::Consistency(msg),
            EnclaveError::Transport(msg) => Self::Transport(msg),
            // auth_error deliberately drops the underlying detail: spec.md §7
            // requires it to carry "no info leak beyond error code", since a
            // detailed message here could help an attacker probe which
            // accounts have a registered viewing key.
            EnclaveError::Auth(_) => Self::Auth,
            EnclaveError::Protocol(msg) => Self::Protocol(msg),
            EnclaveError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<FilterError> for RpcError {
    fn from(err: FilterError) -> Self {
        Self::Protocol(err.to_string())
    }
}

pub fn not_found_error() -> ErrorObjectOwned {
    ErrorObjectOwned::owned(NOT_FOUND_CODE, "not found", None::<()>)
}

pub fn decode_error(msg: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(DECODE_ERROR_CODE, msg.into(), None::<()>)
}

pub fn consistency_error(msg: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(CONSISTENCY_ERROR_CODE, msg.into(), None::<()>)
}

pub fn transport_error(msg: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(TRANSPORT_ERROR_CODE, msg.into(), None::<()>)
}

pub fn auth_error() -> ErrorObjectOwned {
    ErrorObjectOwned::owned(AUTH_ERROR_CODE, "not authorized", None::<()>)
}

pub fn protocol_error(msg: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(PROTOCOL_ERROR_CODE, msg.into(), None::<()>)
}

pub fn internal_error(msg: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(INTERNAL_ERROR_CODE, msg.into(), None::<()>)
}

pub fn invalid_params_error(msg: impl Into<String>) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(INVALID_PARAMS_CODE, msg.into(), None::<()>)
}

/// Convenience for call sites holding an `EnclaveError` or `FilterError`
/// directly - converts through [`RpcError`] in one step.
pub fn rpc_err(err: impl Into<RpcError>) -> ErrorObjectOwned {
    ErrorObjectOwned::from(err.into())
}

impl From<RpcError> for ErrorObjectOwned {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::NotFound => not_found_error(),
            RpcError::Decode(msg) => decode_error(msg),
            RpcError::Consistency(msg) => consistency_error(msg),
            RpcError::Transport(msg) => transport_error(msg),
            RpcError::Auth => auth_error(),
            RpcError::Protocol(msg) => protocol_error(msg),
            RpcError::Internal(msg) => internal_error(msg),
        }
    }
}
