//! # Node Runtime
//!
//! Drives the application the way a single-validator consensus engine
//! would: InitChain once, then one block per submitted transaction.
//!
//! ```text
//! start ─► load_latest_version ─► InitChain (height 0 only)
//!   │
//!   └─► apply(tx) ─► BeginBlock ─► DeliverTx ─► EndBlock ─► Commit
//! ```

use crate::container::{build_app, NodeConfig};
use crate::genesis::GenesisConfig;
use crate::kvstore::{KvStoreTx, KV_MAPPER_NAME};
use anyhow::{Context, Result};
use qb_04_txs::TxStd;
use qb_08_baseabci::{BaseApp, RequestBeginBlock, RequestEndBlock, RequestQuery};
use shared_types::{BlockHeader, TxResult};
use std::io::BufRead;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Gas ceiling of every submitted envelope.
const TX_MAX_GAS: i64 = 1_000_000;

/// Result of one single-transaction block.
#[derive(Debug, Clone)]
pub struct BlockOutcome {
    /// Committed height.
    pub height: u64,
    /// DeliverTx result.
    pub result: TxResult,
    /// App hash after Commit.
    pub app_hash: Vec<u8>,
}

/// Single-node driver around the key/value application.
pub struct NodeRuntime {
    config: NodeConfig,
    app: BaseApp,
}

impl NodeRuntime {
    /// Build the application. Nothing is loaded until `start`.
    pub fn new(config: NodeConfig) -> Result<Self> {
        let app = build_app(&config).context("building application")?;
        Ok(Self { config, app })
    }

    /// Load the latest version and apply genesis on a fresh chain.
    pub fn start(&mut self) -> Result<()> {
        self.app
            .load_latest_version()
            .context("loading latest version")?;
        if self.app.last_block_height() > 0 {
            info!(height = self.app.last_block_height(), "resuming chain");
            return Ok(());
        }

        let genesis = match &self.config.genesis {
            Some(path) => GenesisConfig::load(path)
                .with_context(|| format!("loading genesis from {}", path.display()))?,
            None => GenesisConfig::default(),
        };
        let req = genesis.into_request(&self.config.chain_id)?;
        self.app.init_chain(req).context("applying genesis")?;
        Ok(())
    }

    /// The application.
    pub fn app(&self) -> &BaseApp {
        &self.app
    }

    /// Run `tx` as the only transaction of the next block.
    pub fn apply(&mut self, tx: KvStoreTx) -> Result<BlockOutcome> {
        let height = self.app.last_block_height() + 1;
        let header = BlockHeader {
            chain_id: self.config.chain_id.clone(),
            height,
            time: unix_now(),
            ..Default::default()
        };
        let bytes = TxStd::new(Arc::new(tx), self.config.chain_id.clone(), TX_MAX_GAS)
            .encode(self.app.codec())
            .context("encoding transaction")?;

        self.app.begin_block(RequestBeginBlock {
            header,
            last_commit_votes: Vec::new(),
        })?;
        let result = self.app.deliver_tx(&bytes);
        self.app.end_block(RequestEndBlock { height })?;
        let commit = self.app.commit()?;

        info!(
            height,
            code = result.code,
            gas_used = result.gas_used,
            app_hash = %hex::encode(&commit.data),
            "block committed"
        );
        Ok(BlockOutcome {
            height,
            result,
            app_hash: commit.data,
        })
    }

    /// Apply every `key=value` line of `input`. Returns the number of
    /// committed blocks.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<u64> {
        let mut blocks = 0;
        for line in input.lines() {
            let line = line.context("reading input")?;
            if line.trim().is_empty() {
                continue;
            }
            match KvStoreTx::parse(&line) {
                Some(tx) => {
                    let outcome = self.apply(tx)?;
                    if !outcome.result.is_ok() {
                        warn!(height = outcome.height, log = %outcome.result.log, "transaction failed");
                    }
                    blocks += 1;
                }
                None => warn!(line = %line, "expected key=value"),
            }
        }
        Ok(blocks)
    }

    /// Committed value of `key`.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let res = self.app.query(RequestQuery {
            path: format!("/store/{KV_MAPPER_NAME}/key"),
            data: key.as_bytes().to_vec(),
            height: 0,
        });
        if !res.is_ok() {
            anyhow::bail!("query failed: {}", res.log);
        }
        if res.value.is_empty() {
            return Ok(None);
        }
        let value = self
            .app
            .codec()
            .decode(&res.value)
            .context("decoding stored value")?;
        Ok(Some(value))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
