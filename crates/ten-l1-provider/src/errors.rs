use ten_l1_client::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("L1 node does not support block subscriptions")]
    SubscriptionUnsupported,

    #[error("no new block: {0}")]
    NoNewBlock(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl From<TransportError> for ProviderError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::SubscriptionUnsupported => Self::SubscriptionUnsupported,
            TransportError::NotFound(msg) | TransportError::Transport(msg) => Self::Transport(msg),
        }
    }
}
