//! # Genesis Builder
//!
//! Parses the genesis file and builds the InitChain request.

use qb_08_baseabci::RequestInitChain;
use serde::{Deserialize, Serialize};
use shared_crypto::Ed25519PublicKey;
use shared_types::{ConsensusParams, ValidatorUpdate};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Genesis loading errors.
#[derive(Debug, Error)]
pub enum GenesisError {
    /// The file could not be read.
    #[error("Failed to read genesis file {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid genesis JSON.
    #[error("Invalid genesis JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The file names another chain than the node runs.
    #[error("Genesis chain id {found} does not match configured chain id {expected}")]
    ChainIdMismatch {
        /// Configured chain id.
        expected: String,
        /// Chain id in the file.
        found: String,
    },

    /// A validator entry is malformed.
    #[error("Invalid genesis validator: {0}")]
    InvalidValidator(String),
}

/// Initial validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisValidator {
    /// Hex-encoded Ed25519 public key.
    pub pub_key: String,
    /// Voting power.
    pub power: i64,
}

/// Parsed genesis file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Chain id; must match the node's when present.
    #[serde(default)]
    pub chain_id: Option<String>,
    /// Genesis timestamp (Unix seconds).
    #[serde(default)]
    pub genesis_time: u64,
    /// Consensus parameters persisted at InitChain.
    #[serde(default)]
    pub consensus_params: Option<ConsensusParams>,
    /// Initial validator set.
    #[serde(default)]
    pub validators: Vec<GenesisValidator>,
    /// Application state handed to InitChain as JSON bytes.
    #[serde(default)]
    pub app_state: serde_json::Value,
}

impl GenesisConfig {
    /// Read and parse `path`.
    pub fn load(path: &Path) -> Result<Self, GenesisError> {
        let bytes = std::fs::read(path).map_err(|source| GenesisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&bytes)
    }

    /// Parse genesis JSON.
    pub fn from_json(bytes: &[u8]) -> Result<Self, GenesisError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// InitChain request for a node configured with `chain_id`.
    pub fn into_request(self, chain_id: &str) -> Result<RequestInitChain, GenesisError> {
        if let Some(found) = &self.chain_id {
            if found != chain_id {
                return Err(GenesisError::ChainIdMismatch {
                    expected: chain_id.to_string(),
                    found: found.clone(),
                });
            }
        }

        let validators = self
            .validators
            .iter()
            .map(|v| {
                let bytes = hex::decode(&v.pub_key)
                    .map_err(|e| GenesisError::InvalidValidator(e.to_string()))?;
                let key = Ed25519PublicKey::from_slice(&bytes)
                    .map_err(|e| GenesisError::InvalidValidator(e.to_string()))?;
                Ok(ValidatorUpdate {
                    pub_key: key.as_bytes().to_vec(),
                    power: v.power,
                })
            })
            .collect::<Result<Vec<_>, GenesisError>>()?;

        let app_state_bytes = match &self.app_state {
            serde_json::Value::Null => Vec::new(),
            state => serde_json::to_vec(state)?,
        };

        Ok(RequestInitChain {
            time: self.genesis_time,
            chain_id: chain_id.to_string(),
            consensus_params: self.consensus_params,
            validators,
            app_state_bytes,
        })
    }
}
