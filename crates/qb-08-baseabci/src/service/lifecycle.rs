//! Info, InitChain, BeginBlock, EndBlock and Commit.

use super::BaseApp;
use crate::domain::{
    AppError, RequestBeginBlock, RequestEndBlock, RequestInitChain, ResponseBeginBlock,
    ResponseCommit, ResponseEndBlock, ResponseInfo, ResponseInitChain,
};
use crate::VERSION;
use qb_05_qcp::{QcpGenesis, QcpMapper, QCP_MAPPER_NAME};
use qb_07_validator::{
    ConsensusMapper, ValidatorMapper, CONSENSUS_MAPPER_NAME, VALIDATOR_MAPPER_NAME,
};
use shared_types::BlockHeader;
use tracing::{debug, info};

impl BaseApp {
    /// Identity and last committed state.
    pub fn info(&self) -> ResponseInfo {
        let id = self.cms.last_commit_id();
        ResponseInfo {
            data: self.config.name.clone(),
            version: VERSION.to_string(),
            last_block_height: id.version,
            last_block_app_hash: id.hash.to_vec(),
        }
    }

    /// Apply genesis in a fresh deliver state: trusted QCP chains from the
    /// JSON app state, consensus parameters, then the init hook.
    pub fn init_chain(&mut self, req: RequestInitChain) -> Result<ResponseInitChain, AppError> {
        let mut header = BlockHeader::genesis(req.chain_id.clone());
        header.time = req.time;
        self.deliver_state = Some(self.make_state(header.clone(), false));
        self.check_state = Some(self.make_state(header, true));
        let ctx = self.deliver_ctx("init_chain")?;

        let genesis = QcpGenesis::from_json(&req.app_state_bytes)?;
        genesis.init(&*ctx.require_mapper::<QcpMapper>(QCP_MAPPER_NAME)?)?;

        if let Some(params) = &req.consensus_params {
            ctx.require_mapper::<ConsensusMapper>(CONSENSUS_MAPPER_NAME)?
                .set_consensus_params(params)?;
        }

        let res = match &self.init_chainer {
            Some(handler) => handler(&ctx, &req)?,
            None => ResponseInitChain::default(),
        };
        info!(
            chain_id = %req.chain_id,
            trusted_chains = genesis.qcps.len(),
            "chain initialized"
        );
        Ok(res)
    }

    /// Open a block. Creates the deliver state unless InitChain already did.
    pub fn begin_block(&mut self, req: RequestBeginBlock) -> Result<ResponseBeginBlock, AppError> {
        let header = req.header.clone();
        let mut state = match self.deliver_state.take() {
            Some(mut state) => {
                state.ctx = state.ctx.with_block_header(header.clone());
                state
            }
            None => self.make_state(header.clone(), false),
        };
        state.ctx = state.ctx.reset_block_tx_index();
        let ctx = state.ctx.clone();
        self.deliver_state = Some(state);

        let res = match &self.begin_blocker {
            Some(handler) => handler(&ctx, &req),
            None => ResponseBeginBlock::default(),
        };

        let validators = ctx.require_mapper::<ValidatorMapper>(VALIDATOR_MAPPER_NAME)?;
        validators.set_last_block_proposer(&header.proposer)?;
        validators.clear_validator_update_set();

        self.vote_infos = req.last_commit_votes;
        debug!(height = header.height, proposer = %header.proposer, "BeginBlock");
        Ok(res)
    }

    /// Close the block. Pending validator updates replace the hook's when
    /// updates are enabled.
    pub fn end_block(&mut self, req: RequestEndBlock) -> Result<ResponseEndBlock, AppError> {
        let ctx = self.deliver_ctx("end_block")?;
        let mut res = match &self.end_blocker {
            Some(handler) => handler(&ctx, &req),
            None => ResponseEndBlock::default(),
        };

        let validators = ctx.require_mapper::<ValidatorMapper>(VALIDATOR_MAPPER_NAME)?;
        if validators.is_enable_validator_updated()? {
            res.validator_updates = validators.get_validator_update_set()?;
        }
        debug!(height = req.height, updates = res.validator_updates.len(), "EndBlock");
        Ok(res)
    }

    /// Write the deliver state through, commit a version and restart the
    /// check lineage from it.
    pub fn commit(&mut self) -> Result<ResponseCommit, AppError> {
        let state = self
            .deliver_state
            .take()
            .ok_or(AppError::NotInitialized("commit"))?;
        let mut header = state.ctx.block_header().clone();
        header.chain_id = state.ctx.chain_id().to_string();

        state.ms.write();
        let id = self.cms.commit();
        info!(
            version = id.version,
            app_hash = %hex::encode(id.hash),
            "committed"
        );

        self.check_state = Some(self.make_state(header, true));
        Ok(ResponseCommit {
            data: id.hash.to_vec(),
        })
    }
}
