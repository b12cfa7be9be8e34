//! Coin accounts and transfers.

use qb_02_mapper::{Codec, CodecError};
use qb_03_context::Context;
use qb_04_txs::{ExecOutcome, ITx};
use qb_06_account::{Account, AccountMapper, BaseAccount, ACCOUNT_MAPPER_NAME};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Gas, TxError};
use std::any::Any;

/// Account holding a coin balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinAccount {
    pub base: BaseAccount,
    pub coins: u64,
}

impl Account for CoinAccount {
    fn with_address(address: Address) -> Self {
        Self {
            base: BaseAccount::new(address),
            coins: 0,
        }
    }

    fn base(&self) -> &BaseAccount {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseAccount {
        &mut self.base
    }
}

/// Genesis balance entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisAccount {
    /// Hex-encoded address.
    pub address: String,
    pub coins: u64,
}

/// Move `amount` coins from `from` to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferTx {
    pub from: Address,
    pub to: Address,
    pub amount: u64,
}

impl ITx for TransferTx {
    fn type_tag(&self) -> &'static str {
        "test/TransferTx"
    }

    fn validate_data(&self, _ctx: &Context) -> Result<(), TxError> {
        if self.amount == 0 {
            return Err(TxError::TxDecode("zero transfer".into()));
        }
        if self.from == self.to {
            return Err(TxError::InvalidAddress("transfer to self".into()));
        }
        Ok(())
    }

    fn exec(&self, ctx: &Context) -> Result<ExecOutcome, TxError> {
        let accounts = ctx.require_mapper::<AccountMapper<CoinAccount>>(ACCOUNT_MAPPER_NAME)?;
        let mut from = accounts
            .get_account(&self.from)?
            .ok_or_else(|| TxError::UnknownAddress(self.from.to_string()))?;
        if from.coins < self.amount {
            return Err(TxError::InsufficientFunds(format!(
                "balance {} below {}",
                from.coins, self.amount
            )));
        }
        from.coins -= self.amount;
        accounts.set_account(&from)?;

        let mut to = accounts
            .get_account(&self.to)?
            .unwrap_or_else(|| accounts.new_account_with_address(self.to));
        to.coins += self.amount;
        accounts.set_account(&to)?;
        Ok(ExecOutcome::ok())
    }

    fn signers(&self) -> Vec<Address> {
        vec![self.from]
    }

    fn calc_gas(&self) -> Gas {
        10
    }

    fn gas_payer(&self) -> Option<Address> {
        Some(self.from)
    }

    fn sign_data(&self) -> Vec<u8> {
        let mut out = self.from.as_bytes().to_vec();
        out.extend_from_slice(self.to.as_bytes());
        out.extend_from_slice(&self.amount.to_be_bytes());
        out
    }

    fn encode(&self, codec: &Codec) -> Result<Vec<u8>, CodecError> {
        codec.encode(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
