//! # Gas Meter
//!
//! A limit-checked counter shared by every clone of a context. Clones refer
//! to the same meter so consumption inside nested cache scopes is counted
//! once.

use crate::errors::TxError;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

/// Gas units.
pub type Gas = u64;

#[derive(Debug)]
struct MeterState {
    limit: Option<Gas>,
    consumed: Gas,
}

/// Shared gas meter. `limit == None` is an infinite meter.
#[derive(Debug, Clone)]
pub struct GasMeter {
    state: Arc<Mutex<MeterState>>,
}

impl GasMeter {
    /// Meter that fails once `limit` is exceeded.
    pub fn new(limit: Gas) -> Self {
        Self {
            state: Arc::new(Mutex::new(MeterState {
                limit: Some(limit),
                consumed: 0,
            })),
        }
    }

    /// Meter without a limit, used at genesis and for block-level work.
    pub fn infinite() -> Self {
        Self {
            state: Arc::new(Mutex::new(MeterState {
                limit: None,
                consumed: 0,
            })),
        }
    }

    /// Configured limit.
    pub fn limit(&self) -> Option<Gas> {
        self.state.lock().limit
    }

    /// Gas consumed so far.
    pub fn consumed(&self) -> Gas {
        self.state.lock().consumed
    }

    /// Record consumption without checking the limit.
    pub fn record(&self, amount: Gas, descriptor: &str) {
        let mut state = self.state.lock();
        state.consumed = state.consumed.saturating_add(amount);
        trace!(amount, descriptor, consumed = state.consumed, "gas consumed");
    }

    /// Record consumption and fail if the limit is now exceeded.
    pub fn consume(&self, amount: Gas, descriptor: &str) -> Result<(), TxError> {
        self.record(amount, descriptor);
        if self.is_past_limit() {
            return Err(TxError::OutOfGas(format!(
                "{descriptor}: consumed {} of {}",
                self.consumed(),
                self.limit().unwrap_or(Gas::MAX)
            )));
        }
        Ok(())
    }

    /// True once consumption is strictly greater than the limit.
    pub fn is_past_limit(&self) -> bool {
        let state = self.state.lock();
        matches!(state.limit, Some(limit) if state.consumed > limit)
    }
}

impl Default for GasMeter {
    fn default() -> Self {
        Self::infinite()
    }
}
