//! CheckTx and DeliverTx.
//!
//! ```text
//! TxStd  ─► gas ─► validate ─► authenticate ─► cache ─► exec* ─► gas handler ─► write?
//! TxQcp  ─► sequence == in+1 ─► trusted signature ─► in = sequence ─► TxStd path ─► reply
//! ```

use super::BaseApp;
use qb_02_mapper::Codec;
use qb_03_context::Context;
use qb_04_txs::{decode_tx, QcpTxResult, Tx, TxQcp, TxStd, SIGNERS_KEY};
use qb_05_qcp::{qcp_event, QcpMapper, QCP_MAPPER_NAME};
use shared_types::{GasMeter, TxError, TxResult};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

/// Where a `TxStd` comes from.
#[derive(Debug, Clone, Copy)]
enum Origin<'a> {
    Local,
    Remote { from: &'a str, is_result: bool },
}

impl<'a> Origin<'a> {
    fn from_chain_id(self) -> &'a str {
        match self {
            Origin::Local => "",
            Origin::Remote { from, .. } => from,
        }
    }

    fn accepts_qcp_result(self) -> bool {
        matches!(self, Origin::Remote { is_result: true, .. })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run `step`, turning a panic into `TxError::Internal`.
fn contained<T, F>(label: &'static str, step: F) -> Result<T, TxError>
where
    F: FnOnce() -> T,
{
    panic::catch_unwind(AssertUnwindSafe(step)).map_err(|payload| {
        let msg = panic_message(payload.as_ref());
        error!(step = label, panic = %msg, "recovered from panic");
        TxError::Internal(format!("{label} recovered: {msg}"))
    })
}

/// Run `step`, turning a panic into an `Internal` result.
fn guarded<F>(label: &'static str, step: F) -> TxResult
where
    F: FnOnce() -> TxResult,
{
    contained(label, step).unwrap_or_else(|err| err.result())
}

/// `decode_tx` behind the panic boundary; payload decoders are registered by the application.
fn decode_contained(codec: &Codec, bytes: &[u8]) -> Result<Tx, TxError> {
    contained("decode_tx", || decode_tx(codec, bytes)).and_then(|decoded| decoded)
}

/// Context with the envelope's gas meter (unlimited at genesis), charged
/// with the payloads' static gas.
fn with_tx_gas(ctx: &Context, tx: &TxStd) -> (Context, Result<(), TxError>) {
    with_tx_gas_metered(ctx, tx, true)
}

/// `metered == false` lifts the ceiling; result notifications are
/// chain-generated with a zero `max_gas`.
fn with_tx_gas_metered(
    ctx: &Context,
    tx: &TxStd,
    metered: bool,
) -> (Context, Result<(), TxError>) {
    let meter = if ctx.block_height() == 0 || !metered {
        GasMeter::infinite()
    } else {
        GasMeter::new(tx.gas_limit())
    };
    let charged = meter.consume(tx.calc_gas(), "sum of itxs' calc_gas");
    (ctx.with_gas_meter(meter), charged)
}

fn ensure_gas(ctx: &Context) -> Result<(), TxError> {
    let meter = ctx.gas_meter();
    if meter.is_past_limit() {
        return Err(TxError::OutOfGas(format!(
            "consumed {} of {}",
            meter.consumed(),
            meter.limit().unwrap_or_default()
        )));
    }
    Ok(())
}

fn finish(mut result: TxResult, ctx: &Context, tx: &TxStd) -> TxResult {
    result.gas_wanted = tx.gas_limit();
    if result.gas_used == 0 {
        result.gas_used = ctx.gas_meter().consumed();
    }
    result
}

fn rejected(err: TxError, tx: &TxStd) -> TxResult {
    TxResult {
        gas_wanted: tx.gas_limit(),
        ..err.result()
    }
}

impl BaseApp {
    // ---------------------------------------------------------------------
    // CheckTx
    // ---------------------------------------------------------------------

    /// Admission check against the check state. Nonces advance in the check
    /// lineage; durable state is never touched.
    pub fn check_tx(&mut self, bytes: &[u8]) -> TxResult {
        let Some(state) = &self.check_state else {
            return TxError::Internal("CheckTx before a version was loaded".into()).result();
        };
        let tx = match decode_contained(&self.codec, bytes) {
            Ok(tx) => tx,
            Err(err) => return err.result(),
        };
        let ctx = state.ctx.with_tx_bytes(bytes.to_vec());

        let result = match &tx {
            Tx::Std(tx) => guarded("check_tx_std", || self.check_tx_std(&ctx, tx)),
            Tx::Qcp(tx) => guarded("check_tx_qcp", || self.check_tx_qcp(&ctx, tx)),
        };
        debug!(code = result.code, gas_used = result.gas_used, "CheckTx");
        result
    }

    fn check_tx_std(&self, ctx: &Context, tx: &TxStd) -> TxResult {
        let (ctx, charged) = with_tx_gas(ctx, tx);
        let result = match charged.and_then(|()| self.validate_tx_std(&ctx, tx, Origin::Local)) {
            Ok(_) => TxResult::ok(),
            Err(err) => err.result(),
        };
        finish(result, &ctx, tx)
    }

    fn check_tx_qcp(&self, ctx: &Context, tx: &TxQcp) -> TxResult {
        let (ctx, charged) = with_tx_gas_metered(ctx, &tx.tx_std, !tx.is_result);
        let result = match charged.and_then(|()| self.precheck_inbound(&ctx, tx)) {
            Ok(()) => TxResult::ok(),
            Err(err) => err.result(),
        };
        finish(result, &ctx, &tx.tx_std)
    }

    /// Loose admission: rejects replays of accepted sequences. Without a
    /// trusted key the signature is left to delivery.
    fn precheck_inbound(&self, ctx: &Context, tx: &TxQcp) -> Result<(), TxError> {
        tx.validate_basic_data(ctx.chain_id())?;
        let qcp = ctx.require_mapper::<QcpMapper>(QCP_MAPPER_NAME)?;
        let max_in = qcp.get_max_chain_in_sequence(&tx.from)?;
        if tx.sequence <= max_in {
            return Err(TxError::InvalidSequence(format!(
                "TxQcp sequence {} from {} already accepted. max in sequence: {}",
                tx.sequence, tx.from, max_in
            )));
        }
        match qcp.get_chain_in_trust_pubkey(&tx.from)? {
            Some(trusted) => tx.verify_signature(&trusted),
            None => {
                debug!(from = %tx.from, "no trusted key for chain, signature check deferred");
                Ok(())
            }
        }
    }

    // ---------------------------------------------------------------------
    // DeliverTx
    // ---------------------------------------------------------------------

    /// Execute one transaction of the open block. The block transaction
    /// index advances even when decoding fails.
    pub fn deliver_tx(&mut self, bytes: &[u8]) -> TxResult {
        let Some(state) = self.deliver_state.as_mut() else {
            return TxError::Internal("DeliverTx outside a block".into()).result();
        };
        state.ctx = state.ctx.increment_block_tx_index();
        let block_ctx = state.ctx.clone();

        let tx = match decode_contained(&self.codec, bytes) {
            Ok(tx) => tx,
            Err(err) => return err.result(),
        };
        let ctx = block_ctx
            .with_tx_bytes(bytes.to_vec())
            .with_vote_infos(self.vote_infos.clone());

        let result = match &tx {
            Tx::Std(tx) => self.deliver_tx_std(&ctx, tx),
            Tx::Qcp(tx) => self.deliver_tx_qcp(&ctx, tx),
        };
        debug!(
            index = ctx.block_tx_index(),
            code = result.code,
            gas_used = result.gas_used,
            "DeliverTx"
        );
        result
    }

    fn deliver_tx_std(&self, ctx: &Context, tx: &TxStd) -> TxResult {
        let (ctx, charged) = match contained("tx_gas", || with_tx_gas(ctx, tx)) {
            Ok(gas) => gas,
            Err(err) => return rejected(err, tx),
        };
        let result = match charged {
            Ok(()) => guarded("deliver_tx_std", || self.run_tx_std(&ctx, tx, Origin::Local)),
            Err(err) => err.result(),
        };
        finish(result, &ctx, tx)
    }

    /// Ordering checkpoint, then the wrapped envelope. Unless `tx` is itself
    /// a result notification, the outcome is always queued back to its origin.
    fn deliver_tx_qcp(&self, ctx: &Context, tx: &TxQcp) -> TxResult {
        let metered = !tx.is_result;
        let (gas_ctx, charged) =
            match contained("tx_gas", || with_tx_gas_metered(ctx, &tx.tx_std, metered)) {
                Ok(gas) => gas,
                Err(err) => return rejected(err, &tx.tx_std),
            };

        let checkpoint = guarded("accept_tx_qcp", || match self.accept_inbound(ctx, tx) {
            Ok(()) => TxResult::ok(),
            Err(err) => err.result(),
        });
        if !checkpoint.is_ok() {
            return finish(checkpoint, &gas_ctx, &tx.tx_std);
        }

        let origin = Origin::Remote {
            from: &tx.from,
            is_result: tx.is_result,
        };
        let result = match charged {
            Ok(()) => guarded("deliver_tx_qcp", || {
                self.run_tx_std(&gas_ctx, &tx.tx_std, origin)
            }),
            Err(err) => err.result(),
        };
        let mut result = finish(result, &gas_ctx, &tx.tx_std);

        if !tx.is_result {
            self.reply_to_origin(ctx, tx, &mut result);
        }
        result
    }

    /// Exact next sequence, trusted signature, then advance the inbound
    /// counter in the block state.
    fn accept_inbound(&self, ctx: &Context, tx: &TxQcp) -> Result<(), TxError> {
        tx.validate_basic_data(ctx.chain_id())?;
        let qcp = ctx.require_mapper::<QcpMapper>(QCP_MAPPER_NAME)?;
        let max_in = qcp.get_max_chain_in_sequence(&tx.from)?;
        if tx.sequence != max_in + 1 {
            return Err(TxError::InvalidSequence(format!(
                "TxQcp sequence must be max in sequence + 1. max in sequence: {}, got: {}",
                max_in, tx.sequence
            )));
        }
        let trusted = qcp.get_chain_in_trust_pubkey(&tx.from)?.ok_or_else(|| {
            TxError::InvalidPubKey(format!("chain {} has no trusted pubkey", tx.from))
        })?;
        tx.verify_signature(&trusted)?;
        qcp.set_max_chain_in_sequence(&tx.from, tx.sequence)?;
        debug!(from = %tx.from, sequence = tx.sequence, "inbound TxQcp accepted");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Shared steps
    // ---------------------------------------------------------------------

    /// Structural checks, then signature and nonce binding when an account
    /// type is registered. Returns the context carrying the signers.
    fn validate_tx_std(
        &self,
        ctx: &Context,
        tx: &TxStd,
        origin: Origin<'_>,
    ) -> Result<Context, TxError> {
        if tx.contains_qcp_result() && !origin.accepts_qcp_result() {
            return Err(TxError::Unauthorized(
                "QcpTxResult is only accepted inside a result TxQcp".into(),
            ));
        }
        tx.validate_basic_data(ctx)?;
        ensure_gas(ctx)?;

        let Some(authenticator) = &self.authenticator else {
            return Ok(ctx.clone());
        };
        let signers = authenticator.authenticate(ctx, tx, origin.from_chain_id())?;
        ensure_gas(ctx)?;
        Ok(ctx.with_value(SIGNERS_KEY, signers))
    }

    /// Validate, then execute every payload in a fresh cache of the deliver
    /// store. The cache is written back only when the envelope succeeds.
    fn run_tx_std(&self, ctx: &Context, tx: &TxStd, origin: Origin<'_>) -> TxResult {
        let ctx = match self.validate_tx_std(ctx, tx, origin) {
            Ok(ctx) => ctx,
            Err(err) => return err.result(),
        };

        let (run_ctx, write_cache) = ctx.cache_context();
        let mut result = TxResult::ok();
        let mut events = Vec::new();
        for itx in &tx.itxs {
            let outcome = match itx.exec(&run_ctx) {
                Ok(outcome) => outcome,
                Err(err) => {
                    result = err.result();
                    break;
                }
            };
            result = outcome.result;
            if !result.is_ok() {
                break;
            }
            events.append(&mut result.events);

            if let Some(cross_tx) = outcome.cross_tx {
                match self.save_cross_chain_tx(&run_ctx, cross_tx, false) {
                    Ok(saved) => events.push(qcp_event(&saved)),
                    Err(err) => {
                        result = err.result();
                        break;
                    }
                }
            }
        }

        let mut gas_used = None;
        if let Some(handler) = &self.gas_handler {
            let payer = tx.itxs.first().and_then(|itx| itx.gas_payer());
            match handler(&run_ctx, payer) {
                Ok(used) => gas_used = Some(used),
                Err(err) => result = err.result(),
            }
        }
        if result.is_ok() {
            if let Err(err) = ensure_gas(&run_ctx) {
                result = err.result();
            }
        }

        if result.is_ok() {
            result.events = events;
            write_cache();
        }
        if let Some(used) = gas_used {
            result.gas_used = used;
        }
        result
    }

    /// Complete `skeleton` with this chain's routing data, allocate its
    /// sequence and archive it through `ctx`.
    fn save_cross_chain_tx(
        &self,
        ctx: &Context,
        skeleton: TxQcp,
        is_result: bool,
    ) -> Result<TxQcp, TxError> {
        if self.qcp_signer.is_none() && !is_result {
            error!(to = %skeleton.to, "outbound TxQcp produced but no QCP signer is configured");
        }
        let qcp = ctx.require_mapper::<QcpMapper>(QCP_MAPPER_NAME)?;
        let tx = TxQcp {
            from: ctx.chain_id().to_string(),
            sequence: 0,
            sig: Default::default(),
            block_height: ctx.block_height(),
            tx_index: ctx.block_tx_index(),
            is_result,
            ..skeleton
        };
        Ok(qcp.sign_and_save_tx_qcp(tx, self.qcp_signer.as_deref())?)
    }

    /// Queue a `QcpTxResult` for `tx` at block level, so it persists
    /// whatever the delivery outcome.
    fn reply_to_origin(&self, ctx: &Context, tx: &TxQcp, result: &mut TxResult) {
        let reply = QcpTxResult::from_result(result, tx.sequence, &tx.extends);
        let skeleton = TxQcp::skeleton(
            tx.from.clone(),
            TxStd::new(Arc::new(reply), tx.from.clone(), 0),
        );
        let block_ctx = ctx.with_gas_meter(GasMeter::infinite());
        match self.save_cross_chain_tx(&block_ctx, skeleton, true) {
            Ok(saved) => result.events.push(qcp_event(&saved)),
            Err(err) => error!(
                to = %tx.from,
                sequence = tx.sequence,
                error = %err,
                "failed to queue QcpTxResult"
            ),
        }
    }
}
