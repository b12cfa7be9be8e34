//! Request and response messages exchanged with the consensus engine.

use shared_types::{
    BlockHeader, ConsensusParams, Event, TxError, TxResult, ValidatorUpdate, VoteInfo,
    CODESPACE_ROOT,
};

/// Outcome of CheckTx.
pub type ResponseCheckTx = TxResult;

/// Outcome of DeliverTx.
pub type ResponseDeliverTx = TxResult;

/// Application identity and last committed state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseInfo {
    /// Application name.
    pub data: String,
    /// Application version.
    pub version: String,
    /// Height of the last committed version.
    pub last_block_height: u64,
    /// Hash of the last committed version.
    pub last_block_app_hash: Vec<u8>,
}

/// Genesis request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInitChain {
    /// Genesis time (unix seconds).
    pub time: u64,
    /// Chain being created.
    pub chain_id: String,
    /// Initial consensus parameters.
    pub consensus_params: Option<ConsensusParams>,
    /// Initial validator set.
    pub validators: Vec<ValidatorUpdate>,
    /// JSON application state.
    pub app_state_bytes: Vec<u8>,
}

/// Genesis response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseInitChain {
    /// Consensus parameter overrides.
    pub consensus_params: Option<ConsensusParams>,
    /// Validator set overrides.
    pub validators: Vec<ValidatorUpdate>,
}

/// Start of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestBeginBlock {
    /// Header of the block.
    pub header: BlockHeader,
    /// Validators that signed the previous block.
    pub last_commit_votes: Vec<VoteInfo>,
}

/// Response to BeginBlock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBeginBlock {
    /// Events emitted by the pre-block hook.
    pub events: Vec<Event>,
}

/// End of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestEndBlock {
    /// Height of the block.
    pub height: u64,
}

/// Response to EndBlock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseEndBlock {
    /// Validator set changes.
    pub validator_updates: Vec<ValidatorUpdate>,
    /// Consensus parameter changes.
    pub consensus_param_updates: Option<ConsensusParams>,
    /// Events emitted by the post-block hook.
    pub events: Vec<Event>,
}

/// Response to Commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseCommit {
    /// Application hash of the new version.
    pub data: Vec<u8>,
}

/// State query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestQuery {
    /// `app/version`, `store/<store>/key|subspace` or `custom/...`.
    pub path: String,
    /// Key or prefix.
    pub data: Vec<u8>,
    /// Version to read, 0 for the latest.
    pub height: u64,
}

/// Query answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseQuery {
    /// Result code, 0 on success.
    pub code: u32,
    /// Code namespace.
    pub codespace: String,
    /// Error message.
    pub log: String,
    /// Answer bytes.
    pub value: Vec<u8>,
    /// Version the answer was read from.
    pub height: u64,
}

impl ResponseQuery {
    /// Successful answer.
    pub fn ok(value: Vec<u8>, height: u64) -> Self {
        Self {
            codespace: CODESPACE_ROOT.to_string(),
            value,
            height,
            ..Default::default()
        }
    }

    /// True if the code is 0.
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

impl From<TxError> for ResponseQuery {
    fn from(err: TxError) -> Self {
        Self {
            code: err.code().as_u32(),
            codespace: CODESPACE_ROOT.to_string(),
            log: err.to_string(),
            ..Default::default()
        }
    }
}
