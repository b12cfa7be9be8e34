//! Append-only audit log of context mutations.

use parking_lot::Mutex;
use shared_types::{BlockHeader, Gas, VoteInfo};
use std::sync::Arc;

/// One attribute change applied to a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextOp {
    /// Store snapshot replaced.
    MultiStore,
    /// Block header replaced.
    BlockHeader(BlockHeader),
    /// Block height changed.
    BlockHeight(u64),
    /// Chain id changed.
    ChainId(String),
    /// Check/deliver mode changed.
    IsCheckTx(bool),
    /// Raw transaction bytes attached.
    TxBytes(Vec<u8>),
    /// Per-block transaction index changed.
    BlockTxIndex(i64),
    /// Gas meter replaced; `None` is infinite.
    GasMeter(Option<Gas>),
    /// Signing validators attached.
    VoteInfos(Vec<VoteInfo>),
    /// Application value attached under a key.
    Value(&'static str),
}

impl ContextOp {
    /// Attribute name this operation touches.
    pub fn key(&self) -> &'static str {
        match self {
            ContextOp::MultiStore => "multi_store",
            ContextOp::BlockHeader(_) => "block_header",
            ContextOp::BlockHeight(_) => "block_height",
            ContextOp::ChainId(_) => "chain_id",
            ContextOp::IsCheckTx(_) => "is_check_tx",
            ContextOp::TxBytes(_) => "tx_bytes",
            ContextOp::BlockTxIndex(_) => "block_tx_index",
            ContextOp::GasMeter(_) => "gas_meter",
            ContextOp::VoteInfos(_) => "vote_infos",
            ContextOp::Value(key) => *key,
        }
    }
}

/// A logged operation and its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// Strictly increasing, starting at 1.
    pub version: u64,
    /// What changed.
    pub op: ContextOp,
}

/// Shared log. Clones append to the same sequence.
#[derive(Debug, Clone, Default)]
pub struct MutationLog {
    records: Arc<Mutex<Vec<MutationRecord>>>,
}

impl MutationLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `op`, returning its version.
    pub fn append(&self, op: ContextOp) -> u64 {
        let mut records = self.records.lock();
        let version = records.len() as u64 + 1;
        records.push(MutationRecord { version, op });
        version
    }

    /// Record with the given version.
    pub fn get(&self, version: u64) -> Option<MutationRecord> {
        if version == 0 {
            return None;
        }
        self.records.lock().get(version as usize - 1).cloned()
    }

    /// Highest version assigned so far.
    pub fn latest_version(&self) -> u64 {
        self.records.lock().len() as u64
    }

    /// True if both handles share the same log.
    pub fn same_log(&self, other: &MutationLog) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}
