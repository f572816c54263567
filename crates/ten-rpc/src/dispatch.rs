//! The boundary between the envelope (this crate) and whatever executes a
//! decrypted sensitive call. C7's charter is the cryptographic contract,
//! not "what does `eth_call` do against state" - that's left to whatever
//! implements [`SensitiveDispatcher`], keeping this crate ignorant of
//! state-query semantics, matching spec.md §2's component boundary between
//! C6 and C7.

use async_trait::async_trait;
use serde_json::Value;
use ten_primitives::Address;

use crate::errors::RpcError;

/// Handles one decrypted sensitive RPC call on behalf of the server.
/// `account` is the viewing-key owner the caller claims to be acting as -
/// already resolved by the server from a registered viewing key before
/// this is invoked, so implementors can trust it.
#[async_trait]
pub trait SensitiveDispatcher: Send + Sync {
    /// Returns `Ok(None)` for "not found", distinct from an error, per
    /// spec.md §4.4's `nil`/missing-result rule.
    async fn dispatch(
        &self,
        method: &str,
        params: Value,
        account: Address,
    ) -> Result<Option<Value>, RpcError>;
}
