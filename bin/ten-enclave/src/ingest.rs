//! The enclave-internal ingestion method the host relays canonical L1
//! blocks through when host and enclave run as separate processes
//! (SPEC_FULL.md's "RPC call (deployed)" variant of the ingestion
//! entrypoint). Not part of the public confidential RPC surface
//! (`ten_rpc::TenRpcApi`) - registered directly on the server's
//! `RpcModule`, matching `bin/strata/src/services.rs`'s
//! `module.register_method(...)` pattern for a lightweight addition
//! alongside the generated trait module.

use std::sync::Arc;

use jsonrpsee::{types::ErrorObjectOwned, RpcModule};
use serde_json::Value;
use ten_enclave::EnclaveCore;
use ten_executor::StateExecutor;
use ten_l1_client::{L1Block, L1BlockId, L1Tx};
use ten_primitives::Address;
use ten_storage::KvStore;

pub fn ingest_module<S, E>(enclave: Arc<EnclaveCore<S, E>>) -> RpcModule<Arc<EnclaveCore<S, E>>>
where
    S: KvStore + 'static,
    E: StateExecutor + 'static,
{
    let mut module = RpcModule::new(enclave);
    module
        .register_method("ten_ingestL1Block", |params, enclave, _| {
            let raw: Value = params.parse()?;
            let block = parse_l1_block(&raw).map_err(|e| {
                ErrorObjectOwned::owned(-32602, format!("invalid L1 block payload: {e}"), None::<()>)
            })?;
            // `None` here is not "no rollup possible" - `ingest_l1_block`
            // scans `block`'s own transactions for a publication
            // addressed to the enclave's configured rollup address.
            enclave
                .ingest_l1_block(&block, None)
                .map(|_| ())
                .map_err(|e| ErrorObjectOwned::owned(-32000, e.to_string(), None::<()>))
        })
        .expect("method name is unique");
    module
}

fn parse_l1_block(raw: &Value) -> Result<L1Block, String> {
    let hash = field_str(raw, "hash")?.parse::<L1BlockId>().map_err(|e| e.to_string())?;
    let parent_hash = field_str(raw, "parent_hash")?
        .parse::<L1BlockId>()
        .map_err(|e| e.to_string())?;
    let height = raw
        .get("height")
        .and_then(Value::as_u64)
        .ok_or_else(|| "missing height".to_string())?;
    let timestamp = raw
        .get("timestamp")
        .and_then(Value::as_u64)
        .ok_or_else(|| "missing timestamp".to_string())?;

    let transactions = raw
        .get("transactions")
        .and_then(Value::as_array)
        .ok_or_else(|| "missing transactions array".to_string())?
        .iter()
        .map(parse_l1_tx)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(L1Block {
        hash,
        parent_hash,
        height,
        timestamp,
        transactions,
    })
}

fn parse_l1_tx(raw: &Value) -> Result<L1Tx, String> {
    let to = field_str(raw, "to")?.parse::<Address>().map_err(|e| e.to_string())?;
    let payload_hex = field_str(raw, "payload")?;
    let payload = hex::decode(payload_hex.strip_prefix("0x").unwrap_or(payload_hex)).map_err(|e| e.to_string())?;
    Ok(L1Tx { to, payload })
}

fn field_str<'a>(raw: &'a Value, name: &str) -> Result<&'a str, String> {
    raw.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("missing {name} field"))
}
