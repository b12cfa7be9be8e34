//! # QBase Node
//!
//! Runs the key/value application on a single node.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`RUST_LOG`, default `info`)
//! 2. Load configuration from the environment
//! 3. Build the application and load the latest version
//! 4. Apply genesis on a fresh chain
//! 5. Commit one block per `key=value` line on stdin

use anyhow::Result;
use node_runtime::{NodeConfig, NodeRuntime};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = NodeConfig::from_env();
    info!(?config, version = qb_08_baseabci::VERSION, "starting QBase node");

    let mut runtime = NodeRuntime::new(config)?;
    runtime.start()?;

    info!("reading key=value lines from stdin");
    let blocks = runtime.run(std::io::stdin().lock())?;

    let id = runtime.app().last_commit_id();
    info!(
        blocks,
        height = id.version,
        app_hash = %hex::encode(id.hash),
        "input exhausted, shutting down"
    );
    Ok(())
}
