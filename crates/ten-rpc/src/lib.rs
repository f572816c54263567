//! The encrypted JSON-RPC envelope (C7): method classification, the
//! per-request ECIES wire format, a `jsonrpsee` server implementing it,
//! and (behind the `client` feature) a client-side encrypting wrapper.
//! Grounded on `bin/strata/src/rpc/{mod.rs,node.rs,errors.rs}` for the
//! server/error-mapping shape and `original_source/go/rpc/
//! encrypted_client.go` for the envelope's client-side role.

#[cfg(feature = "client")]
pub mod client;
mod dispatch;
mod envelope;
mod errors;
mod methods;
mod public;
mod server;

pub use dispatch::SensitiveDispatcher;
pub use envelope::{seal, unseal, unseal_bytes};
pub use errors::RpcError;
pub use methods::{coerce_result, is_sensitive, ResultShape, SENSITIVE_METHODS};
pub use public::{PublicRpcApiServer, PublicRpcServer};
pub use server::{TenRpcApiServer, TenRpcServer};
