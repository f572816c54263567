//! Entrypoint for the host process: owns C1 (the L1 client façade) and
//! C2 (the canonical block provider), relays newly delivered L1 blocks to
//! the enclave's ingestion entrypoint over RPC, and exposes a pass-through
//! JSON-RPC surface that forwards ciphertext to the enclave untouched.
//!
//! Grounded on `bin/strata/src/main.rs`'s init/run shape, reworked around
//! this binary's narrower C1+C2 role and the 0/1/2 exit-code contract of
//! spec.md §6. `ten_l1_client::test_support::MockL1Client` stands in for
//! a real L1 transport here - a production Ethereum-RPC client is a
//! "thin wrapper type over upstream Ethereum libraries", explicitly out
//! of scope per spec.md §1.

mod proxy;

use std::{net::SocketAddr, process::ExitCode, sync::Arc};

use jsonrpsee::{core::client::ClientT, http_client::HttpClientBuilder, rpc_params, server::ServerBuilder};
use serde_json::json;
use ten_config::{load_config, CommonArgs, InitError};
use ten_l1_client::{test_support::MockL1Client, L1Block, L1BlockId};
use ten_l1_provider::L1BlockProvider;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let args: CommonArgs = argh::from_env();

    let init = match initialize(&args) {
        Ok(init) => init,
        Err(e) => {
            eprintln!("ten-host: init error: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("ten-host-rt")
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("ten-host: failed to build async runtime: {e}");
            return ExitCode::from(1);
        }
    };

    match rt.block_on(run(init)) {
        Ok(()) => {
            info!("ten-host: clean shutdown");
            ExitCode::from(0)
        }
        Err(e) => {
            error!(error = %e, "ten-host: unrecoverable runtime error");
            ExitCode::from(2)
        }
    }
}

struct Initialized {
    rpc_addr: SocketAddr,
    enclave_rpc_url: String,
    genesis_l1_hash: L1BlockId,
}

fn initialize(args: &CommonArgs) -> Result<Initialized, InitError> {
    let overrides = args.all_overrides()?;
    let config = load_config(&args.config, &overrides)?;

    ten_config::logging::init_logging("ten-host", &config.logging);

    let genesis_l1_hash = config
        .enclave
        .genesis_l1_hash
        .as_deref()
        .unwrap_or(&"0".repeat(64))
        .parse::<L1BlockId>()
        .map_err(|e| InitError::Genesis(format!("invalid enclave.genesis_l1_hash: {e}")))?;

    let enclave_rpc_url = config
        .host
        .enclave_rpc_url
        .clone()
        .ok_or_else(|| InitError::Genesis("host.enclave_rpc_url is required".to_string()))?;

    let rpc_addr: SocketAddr = format!("{}:{}", config.rpc.host, config.rpc.port)
        .parse()
        .map_err(|e| InitError::Genesis(format!("invalid rpc host/port: {e}")))?;

    Ok(Initialized {
        rpc_addr,
        enclave_rpc_url,
        genesis_l1_hash,
    })
}

async fn run(init: Initialized) -> anyhow::Result<()> {
    let Initialized {
        rpc_addr,
        enclave_rpc_url,
        genesis_l1_hash,
    } = init;

    let enclave_client = Arc::new(
        HttpClientBuilder::default()
            .build(&enclave_rpc_url)
            .map_err(|e| anyhow::anyhow!("failed to build enclave rpc client for {enclave_rpc_url}: {e}"))?,
    );

    spawn_l1_relay(genesis_l1_hash, enclave_client.clone());

    let module = proxy::proxy_module(enclave_client);
    let rpc_server = ServerBuilder::new()
        .build(rpc_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind rpc server on {rpc_addr}: {e}"))?;

    info!(%rpc_addr, %enclave_rpc_url, "ten-host: pass-through rpc server listening");
    let handle = rpc_server.start(module);
    handle.stopped().await;
    Ok(())
}

/// Starts the L1 client/provider and a task that relays each canonical
/// block to the enclave's `ten_ingestL1Block` method. Failures beyond the
/// provider's own single-resubscribe policy (§5) log and end the relay
/// task without taking the process down - the RPC server keeps serving.
fn spawn_l1_relay(genesis_l1_hash: L1BlockId, enclave_client: Arc<jsonrpsee::http_client::HttpClient>) {
    tokio::spawn(async move {
        let l1_client = Arc::new(MockL1Client::new());
        l1_client.push_block(L1Block {
            hash: genesis_l1_hash,
            parent_hash: L1BlockId::ZERO,
            height: 1,
            timestamp: 0,
            transactions: Vec::new(),
        });

        let provider = L1BlockProvider::new(l1_client);
        let mut blocks = match provider.start_from_hash(genesis_l1_hash).await {
            Ok(rx) => rx,
            Err(e) => {
                error!(error = %e, "ten-host: failed to start L1 block provider");
                return;
            }
        };

        while let Some(block) = blocks.recv().await {
            let params = json!({
                "hash": block.hash.to_string(),
                "parent_hash": block.parent_hash.to_string(),
                "height": block.height,
                "timestamp": block.timestamp,
                "transactions": block.transactions.iter().map(|tx| json!({
                    "to": tx.to.to_string(),
                    "payload": format!("0x{}", hex::encode(&tx.payload)),
                })).collect::<Vec<_>>(),
            });

            if let Err(e) = enclave_client
                .request::<(), _>("ten_ingestL1Block", rpc_params![params])
                .await
            {
                warn!(error = %e, height = block.height, "ten-host: failed to relay L1 block to enclave");
            }
        }
    });
}
