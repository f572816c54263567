/// Errors surfaced while parsing a filter or call-parameter object. All of
/// these are protocol-layer mistakes made by the client, not enclave-side
/// failures - callers map every variant to `protocol_error` per spec.md §7.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("cannot specify both blockHash and fromBlock/toBlock")]
    Conflict,
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("invalid topic: {0}")]
    InvalidTopic(String),
    #[error("invalid block number tag: {0}")]
    InvalidBlockTag(String),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
    #[error("non-string value for field {0}")]
    NonStringField(String),
    #[error("unexpected shape: {0}")]
    UnexpectedShape(String),
}
