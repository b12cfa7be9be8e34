//! Application configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for `BaseApp`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name reported by Info.
    pub name: String,
    /// Seed of the key signing outbound cross-chain messages.
    pub qcp_signer_seed: Option<[u8; 32]>,
    /// Seal registration once a version is loaded.
    pub seal_on_load: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "qbase".to_string(),
            qcp_signer_seed: None,
            seal_on_load: true,
        }
    }
}

impl AppConfig {
    /// Default configuration with another name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Configuration signing outbound messages with `seed`.
    pub fn with_qcp_signer_seed(mut self, seed: [u8; 32]) -> Self {
        self.qcp_signer_seed = Some(seed);
        self
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("name", &self.name)
            .field("qcp_signer", &self.qcp_signer_seed.map(|_| "[REDACTED]"))
            .field("seal_on_load", &self.seal_on_load)
            .finish()
    }
}
