//! # QCP Genesis
//!
//! The `qcps` section of the application genesis state registers the
//! trusted relayer key of each remote chain:
//!
//! ```json
//! { "qcps": [ { "name": "qstar", "chain_id": "qstar-1", "pub_key": "<hex>" } ] }
//! ```

use crate::errors::QcpError;
use crate::mapper::QcpMapper;
use serde::{Deserialize, Serialize};
use shared_crypto::Ed25519PublicKey;
use tracing::info;

/// One trusted remote chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QcpConfig {
    /// Display name.
    pub name: String,
    /// Remote chain id.
    pub chain_id: String,
    /// Hex-encoded Ed25519 relayer key.
    pub pub_key: String,
}

impl QcpConfig {
    /// Entry for `chain_id` trusting `pub_key`.
    pub fn new(name: impl Into<String>, chain_id: impl Into<String>, pub_key: &Ed25519PublicKey) -> Self {
        Self {
            name: name.into(),
            chain_id: chain_id.into(),
            pub_key: hex::encode(pub_key.as_bytes()),
        }
    }

    /// Decode the configured key.
    pub fn public_key(&self) -> Result<Ed25519PublicKey, QcpError> {
        let invalid = |reason: String| QcpError::InvalidPubKey {
            chain_id: self.chain_id.clone(),
            reason,
        };
        let bytes = hex::decode(&self.pub_key).map_err(|e| invalid(e.to_string()))?;
        Ed25519PublicKey::from_slice(&bytes).map_err(|e| invalid(e.to_string()))
    }
}

/// QCP section of the genesis application state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QcpGenesis {
    /// Trusted remote chains.
    #[serde(default)]
    pub qcps: Vec<QcpConfig>,
}

impl QcpGenesis {
    /// Parse from the raw genesis application state. Empty input is an
    /// empty configuration.
    pub fn from_json(app_state: &[u8]) -> Result<Self, QcpError> {
        if app_state.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Self::default());
        }
        serde_json::from_slice(app_state).map_err(|e| QcpError::InvalidGenesis(e.to_string()))
    }

    /// Serialize as JSON.
    pub fn to_json(&self) -> Result<Vec<u8>, QcpError> {
        serde_json::to_vec(self).map_err(|e| QcpError::InvalidGenesis(e.to_string()))
    }

    /// Check every entry without writing anything.
    pub fn validate(&self) -> Result<(), QcpError> {
        for qcp in &self.qcps {
            if qcp.chain_id.is_empty() {
                return Err(QcpError::MissingChainId(qcp.name.clone()));
            }
            qcp.public_key()?;
        }
        Ok(())
    }

    /// Register every trusted key.
    pub fn init(&self, mapper: &QcpMapper) -> Result<(), QcpError> {
        self.validate()?;
        for qcp in &self.qcps {
            mapper.set_chain_in_trust_pubkey(&qcp.chain_id, &qcp.public_key()?)?;
            info!(chain_id = %qcp.chain_id, name = %qcp.name, "registered trusted QCP chain");
        }
        Ok(())
    }
}
