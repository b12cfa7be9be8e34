//! # Core Domain Entities
//!
//! Block metadata, addresses and the event records attached to results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account address derived from a public key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Build an address from a slice, `None` if the length is wrong.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; ADDRESS_LEN] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// True for the all-zero address.
    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(self.0))
    }
}

/// Header of the block currently being executed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Chain the block belongs to.
    pub chain_id: String,
    /// Block height; 0 while genesis is being applied.
    pub height: u64,
    /// Unix timestamp (seconds).
    pub time: u64,
    /// Validator that proposed the block.
    pub proposer: Address,
}

impl BlockHeader {
    /// Header with only the chain id set, used at genesis.
    pub fn genesis(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            ..Default::default()
        }
    }
}

/// Signing information for one validator in the last commit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteInfo {
    /// Validator address.
    pub validator: Address,
    /// Voting power.
    pub power: i64,
    /// Whether the validator signed the previous block.
    pub signed_last_block: bool,
}

/// A change to the validator set returned from EndBlock.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidatorUpdate {
    /// Ed25519 public key bytes.
    pub pub_key: Vec<u8>,
    /// New voting power, 0 removes the validator.
    pub power: i64,
}

/// Block-level consensus limits persisted at genesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// Maximum block size in bytes.
    pub max_block_bytes: i64,
    /// Maximum gas per block, -1 for unlimited.
    pub max_block_gas: i64,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self {
            max_block_bytes: 22_020_096,
            max_block_gas: -1,
        }
    }
}

/// Generic key/value pair used for event attributes and result extensions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KvPair {
    /// Key bytes.
    pub key: Vec<u8>,
    /// Value bytes.
    pub value: Vec<u8>,
}

impl KvPair {
    /// Build a pair from anything byte-like.
    pub fn new(key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Self {
        Self {
            key: key.as_ref().to_vec(),
            value: value.as_ref().to_vec(),
        }
    }
}

/// A typed event attached to a transaction result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Event {
    /// Event kind, e.g. `message`.
    pub kind: String,
    /// Ordered attributes.
    pub attributes: Vec<KvPair>,
}

impl Event {
    /// Empty event of the given kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
        }
    }

    /// Append an attribute.
    pub fn with_attribute(mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Self {
        self.attributes.push(KvPair::new(key, value));
        self
    }

    /// Value of the first attribute with this key.
    pub fn attribute(&self, key: &str) -> Option<&[u8]> {
        self.attributes
            .iter()
            .find(|a| a.key == key.as_bytes())
            .map(|a| a.value.as_slice())
    }
}
