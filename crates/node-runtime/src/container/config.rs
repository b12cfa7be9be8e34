//! # Node Configuration
//!
//! Defaults overridden by environment variables:
//!
//! | Variable | Field | Format |
//! |----------|-------|--------|
//! | `QB_APP_NAME` | `app_name` | string |
//! | `QB_CHAIN_ID` | `chain_id` | string |
//! | `QB_GENESIS` | `genesis` | path to a genesis JSON file |
//! | `QB_QCP_SIGNER_SEED` | `qcp_signer_seed` | 64 hex chars |
//!
//! Invalid overrides are logged and ignored.

use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// Application name env override.
pub const ENV_APP_NAME: &str = "QB_APP_NAME";
/// Chain id env override.
pub const ENV_CHAIN_ID: &str = "QB_CHAIN_ID";
/// Genesis file env override.
pub const ENV_GENESIS: &str = "QB_GENESIS";
/// QCP signer seed env override.
pub const ENV_QCP_SIGNER_SEED: &str = "QB_QCP_SIGNER_SEED";

/// Complete node configuration.
#[derive(Clone)]
pub struct NodeConfig {
    /// Application name reported by Info.
    pub app_name: String,
    /// Chain the node runs.
    pub chain_id: String,
    /// Genesis file. Without one the chain starts from empty app state.
    pub genesis: Option<PathBuf>,
    /// Seed of the key signing outbound cross-chain messages.
    pub qcp_signer_seed: Option<[u8; 32]>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            app_name: "kvstore".to_string(),
            chain_id: "qbase-local".to_string(),
            genesis: None,
            qcp_signer_seed: None,
        }
    }
}

impl fmt::Debug for NodeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeConfig")
            .field("app_name", &self.app_name)
            .field("chain_id", &self.chain_id)
            .field("genesis", &self.genesis)
            .field(
                "qcp_signer_seed",
                &self.qcp_signer_seed.map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl NodeConfig {
    /// Defaults with process environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides read through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = non_empty(lookup(ENV_APP_NAME)) {
            self.app_name = name;
        }
        if let Some(chain_id) = non_empty(lookup(ENV_CHAIN_ID)) {
            self.chain_id = chain_id;
        }
        if let Some(path) = non_empty(lookup(ENV_GENESIS)) {
            self.genesis = Some(PathBuf::from(path));
        }
        if let Some(seed_hex) = non_empty(lookup(ENV_QCP_SIGNER_SEED)) {
            match parse_seed(&seed_hex) {
                Some(seed) => {
                    self.qcp_signer_seed = Some(seed);
                    info!("Loaded QCP signer seed from environment");
                }
                None => warn!("{ENV_QCP_SIGNER_SEED} must be 32 bytes (64 hex chars)"),
            }
        }
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_seed(seed_hex: &str) -> Option<[u8; 32]> {
    let bytes = hex::decode(seed_hex.trim()).ok()?;
    bytes.try_into().ok()
}
