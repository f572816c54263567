//! The host's pass-through RPC surface: every sensitive method's
//! ciphertext is forwarded to the enclave's RPC endpoint untouched, per
//! spec.md §4.4 ("the host relays encrypted blobs untouched") - the host
//! never holds the enclave secret key and cannot decrypt anything it
//! relays.

use std::sync::Arc;

use jsonrpsee::{
    core::{client::ClientT, params::ArrayParams},
    http_client::HttpClient,
    rpc_params,
    types::ErrorObjectOwned,
    RpcModule,
};
use serde_json::Value;

const SENSITIVE_METHODS: &[&str] = &[
    "eth_call",
    "eth_getBalance",
    "eth_getTransactionReceipt",
    "eth_sendRawTransaction",
    "eth_getTransactionByHash",
    "rpc_subscribe_logs",
    "rpc_add_viewing_key",
];

/// The public half of §4.4's method split - no ciphertext, forwarded
/// verbatim since the host has no state of its own to answer these from
/// (all but `eth_blockNumber`, which the host could answer locally from
/// its own L1 head, are left to the enclave for a single source of truth).
const PUBLIC_PASSTHROUGH_METHODS: &[&str] = &[
    "eth_chainId",
    "eth_blockNumber",
    "eth_getBlockByNumber",
    "eth_getBlockByHash",
    "eth_gasPrice",
    "eth_estimateGas",
    "eth_getCode",
    "eth_getTransactionCount",
    "eth_feeHistory",
];

/// Builds the proxy module: one single-ciphertext passthrough per
/// sensitive method (including `rpc_add_viewing_key`, which is sensitive
/// too - its payload is the registration, not a request - so it takes the
/// same one-argument shape as the rest).
pub fn proxy_module(enclave_client: Arc<HttpClient>) -> RpcModule<Arc<HttpClient>> {
    let mut module = RpcModule::new(enclave_client);

    for method in SENSITIVE_METHODS {
        module
            .register_async_method(method, move |params, client, _| async move {
                let (ciphertext,): (String,) = params.parse()?;
                client
                    .request::<Option<String>, _>(method, rpc_params![ciphertext])
                    .await
                    .map_err(to_error_object)
            })
            .expect("method name is unique");
    }

    for method in PUBLIC_PASSTHROUGH_METHODS {
        module
            .register_async_method(method, move |params, client, _| async move {
                let items: Vec<Value> = params.parse().unwrap_or_default();
                let mut array_params = ArrayParams::new();
                for item in items {
                    array_params
                        .insert(item)
                        .map_err(|e| ErrorObjectOwned::owned(-32602, format!("invalid params: {e}"), None::<()>))?;
                }
                client
                    .request::<Value, _>(method, array_params)
                    .await
                    .map_err(to_error_object)
            })
            .expect("method name is unique");
    }

    module
}

fn to_error_object(err: jsonrpsee::core::ClientError) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(-32000, format!("enclave relay failed: {err}"), None::<()>)
}
