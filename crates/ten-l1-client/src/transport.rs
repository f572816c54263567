use thiserror::Error;

/// Errors surfaced by an [`crate::L1Client`] implementation. The block
/// provider treats [`TransportError::SubscriptionUnsupported`] as fatal
/// (propagated immediately) and every other variant as retryable.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("L1 block not found: {0}")]
    NotFound(String),

    #[error("L1 node does not support block subscriptions")]
    SubscriptionUnsupported,

    #[error("L1 transport error: {0}")]
    Transport(String),
}
