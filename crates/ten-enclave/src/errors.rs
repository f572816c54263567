use thiserror::Error;

/// The error taxonomy shared across the enclave core and the RPC surface
/// it backs: benign absence, decode failure, invariant violation,
/// transport failure, auth failure, malformed request, and programmer
/// bug, per spec.md §7.
#[derive(Debug, Error)]
pub enum EnclaveError {
    #[error("not found")]
    NotFound,

    #[error("decode error: {0}")]
    Decode(String),

    #[error("consistency error: {0}")]
    Consistency(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("auth error: {0}")]
    Auth(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ten_storage::StorageError> for EnclaveError {
    fn from(err: ten_storage::StorageError) -> Self {
        match err {
            ten_storage::StorageError::NotFound => Self::NotFound,
            ten_storage::StorageError::Decode(msg) => Self::Decode(msg),
            ten_storage::StorageError::Backend(msg) => Self::Internal(msg),
        }
    }
}

impl From<ten_executor::ExecError> for EnclaveError {
    fn from(err: ten_executor::ExecError) -> Self {
        Self::Internal(err.to_string())
    }
}
