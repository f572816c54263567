//! The public (unencrypted) half of the outbound JSON-RPC surface, spec.md
//! §4.4's "everything else" list and §6's "method names mirror Ethereum's".
//! None of these carry real EVM semantics - the executor behind them is
//! write-only and has no account ledger (§1 non-goal: not EVM-equivalent)
//! - so they answer with the conventional "nothing to report" value rather
//! than inventing state this node doesn't track.

use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use serde_json::Value;
use ten_primitives::Hash32;

#[rpc(server)]
pub trait PublicRpcApi {
    #[method(name = "eth_chainId")]
    async fn eth_chain_id(&self) -> RpcResult<String>;

    #[method(name = "eth_blockNumber")]
    async fn eth_block_number(&self) -> RpcResult<String>;

    #[method(name = "eth_getBlockByNumber")]
    async fn eth_get_block_by_number(&self, _number: String, _full_txs: bool) -> RpcResult<Option<Value>>;

    #[method(name = "eth_getBlockByHash")]
    async fn eth_get_block_by_hash(&self, _hash: String, _full_txs: bool) -> RpcResult<Option<Value>>;

    #[method(name = "eth_gasPrice")]
    async fn eth_gas_price(&self) -> RpcResult<String>;

    #[method(name = "eth_estimateGas")]
    async fn eth_estimate_gas(&self, _call: Value) -> RpcResult<String>;

    #[method(name = "eth_getCode")]
    async fn eth_get_code(&self, _address: String, _block: String) -> RpcResult<Option<String>>;

    #[method(name = "eth_getTransactionCount")]
    async fn eth_get_transaction_count(&self, _address: String, _block: String) -> RpcResult<String>;

    #[method(name = "eth_feeHistory")]
    async fn eth_fee_history(
        &self,
        _block_count: String,
        _newest_block: String,
        _reward_percentiles: Vec<f64>,
    ) -> RpcResult<Value>;
}

/// Serves [`PublicRpcApi`] with a fixed chain id and the current L1-tracked
/// head height; every query about chain/state this node doesn't model
/// answers "not found"/zero rather than erroring, matching how an
/// Ethereum client answers queries about data it has simply never seen.
pub struct PublicRpcServer {
    chain_id: u64,
    head_height: Box<dyn Fn() -> u64 + Send + Sync>,
    rollup_exists_at_height: Box<dyn Fn(u64) -> bool + Send + Sync>,
    rollup_exists_by_hash: Box<dyn Fn(Hash32) -> bool + Send + Sync>,
}

impl PublicRpcServer {
    pub fn new(
        chain_id: u64,
        head_height: impl Fn() -> u64 + Send + Sync + 'static,
        rollup_exists_at_height: impl Fn(u64) -> bool + Send + Sync + 'static,
        rollup_exists_by_hash: impl Fn(Hash32) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            chain_id,
            head_height: Box::new(head_height),
            rollup_exists_at_height: Box::new(rollup_exists_at_height),
            rollup_exists_by_hash: Box::new(rollup_exists_by_hash),
        }
    }
}

/// Parses `eth_getCode`'s block argument the way `BlockNumberOrHash`
/// disambiguates in the original: a 32-byte hex hash is a rollup hash,
/// `"latest"`/`"pending"` means the current head height, `"earliest"`
/// means height 0, anything else is parsed as a hex or decimal height.
enum BlockRef {
    Height(u64),
    Hash(Hash32),
}

fn parse_block_ref(raw: &str, head_height: u64) -> Option<BlockRef> {
    match raw {
        "latest" | "pending" => return Some(BlockRef::Height(head_height)),
        "earliest" => return Some(BlockRef::Height(0)),
        _ => {}
    }
    if let Ok(hash) = raw.parse::<Hash32>() {
        return Some(BlockRef::Hash(hash));
    }
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    u64::from_str_radix(digits, 16).ok().map(BlockRef::Height)
}

#[jsonrpsee::core::async_trait]
impl PublicRpcApiServer for PublicRpcServer {
    async fn eth_chain_id(&self) -> RpcResult<String> {
        Ok(format!("0x{:x}", self.chain_id))
    }

    async fn eth_block_number(&self) -> RpcResult<String> {
        Ok(format!("0x{:x}", (self.head_height)()))
    }

    async fn eth_get_block_by_number(&self, _number: String, _full_txs: bool) -> RpcResult<Option<Value>> {
        Ok(None)
    }

    async fn eth_get_block_by_hash(&self, _hash: String, _full_txs: bool) -> RpcResult<Option<Value>> {
        Ok(None)
    }

    async fn eth_gas_price(&self) -> RpcResult<String> {
        Ok("0x0".to_string())
    }

    async fn eth_estimate_gas(&self, _call: Value) -> RpcResult<String> {
        Ok("0x0".to_string())
    }

    async fn eth_get_code(&self, _address: String, block: String) -> RpcResult<Option<String>> {
        let found = match parse_block_ref(&block, (self.head_height)()) {
            Some(BlockRef::Height(height)) => (self.rollup_exists_at_height)(height),
            Some(BlockRef::Hash(hash)) => (self.rollup_exists_by_hash)(hash),
            None => false,
        };
        // No account ledger exists behind this executor (§1: not
        // EVM-equivalent), so a found rollup still has no real bytecode
        // to return - only the found/absent distinction is meaningful.
        Ok(found.then(|| "0x".to_string()))
    }

    async fn eth_get_transaction_count(&self, _address: String, _block: String) -> RpcResult<String> {
        Ok("0x0".to_string())
    }

    async fn eth_fee_history(
        &self,
        _block_count: String,
        _newest_block: String,
        _reward_percentiles: Vec<f64>,
    ) -> RpcResult<Value> {
        Ok(serde_json::json!({
            "baseFeePerGas": ["0x0"],
            "gasUsedRatio": [],
            "oldestBlock": "0x0",
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn chain_id_and_block_number_reflect_configured_state() {
        let server = PublicRpcServer::new(7, || 42, |_| false, |_| false);
        assert_eq!(server.eth_chain_id().await.unwrap(), "0x7");
        assert_eq!(server.eth_block_number().await.unwrap(), "0x2a");
    }

    #[tokio::test]
    async fn unmodeled_queries_answer_not_found_rather_than_error() {
        let server = PublicRpcServer::new(7, || 0, |_| false, |_| false);
        assert!(server
            .eth_get_block_by_hash("0xabc".to_string(), false)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn eth_get_code_returns_not_found_when_the_rollup_is_absent() {
        let server = PublicRpcServer::new(7, || 5, |_| false, |_| false);
        assert_eq!(
            server.eth_get_code("0xabc".to_string(), "latest".to_string()).await.unwrap(),
            None
        );
        assert_eq!(
            server
                .eth_get_code("0xabc".to_string(), "0x2".to_string())
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn eth_get_code_returns_code_for_a_found_rollup_height() {
        let server = PublicRpcServer::new(7, || 5, |height| height == 3, |_| false);
        assert_eq!(
            server
                .eth_get_code("0xabc".to_string(), "0x3".to_string())
                .await
                .unwrap(),
            Some("0x".to_string())
        );
    }

    #[tokio::test]
    async fn eth_get_code_resolves_latest_to_the_current_head_height() {
        let server = PublicRpcServer::new(7, || 9, |height| height == 9, |_| false);
        assert_eq!(
            server.eth_get_code("0xabc".to_string(), "latest".to_string()).await.unwrap(),
            Some("0x".to_string())
        );
    }

    #[tokio::test]
    async fn eth_get_code_looks_up_a_rollup_hash_directly() {
        let hash = Hash32::new([9; 32]);
        let server = PublicRpcServer::new(7, || 0, |_| false, move |h| h == hash);
        assert_eq!(
            server.eth_get_code("0xabc".to_string(), hash.to_string()).await.unwrap(),
            Some("0x".to_string())
        );
    }
}
