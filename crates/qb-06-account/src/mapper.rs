//! # AccountMapper
//!
//! Typed access to accounts of type `A`.

use crate::account::Account;
use qb_01_store::{KvStore, StoreKey};
use qb_02_mapper::{BaseMapper, Codec, Mapper, MapperError};
use shared_crypto::Ed25519PublicKey;
use shared_types::{Address, TxError};
use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

/// Registry and sub-store name.
pub const ACCOUNT_MAPPER_NAME: &str = "acc";

/// Key prefix shared by every account.
pub const ACCOUNT_STORE_KEY: &str = "account:";

/// `account:<address bytes>`
pub fn address_store_key(addr: &Address) -> Vec<u8> {
    let mut key = ACCOUNT_STORE_KEY.as_bytes().to_vec();
    key.extend_from_slice(addr.as_bytes());
    key
}

/// Store query path for account keys.
pub fn build_account_store_query_path() -> String {
    format!("/store/{ACCOUNT_MAPPER_NAME}/key")
}

/// Mapper over the `acc` namespace.
pub struct AccountMapper<A: Account> {
    base: BaseMapper,
    _account: PhantomData<fn() -> A>,
}

impl<A: Account> Clone for AccountMapper<A> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            _account: PhantomData,
        }
    }
}

impl<A: Account> AccountMapper<A> {
    /// Unbound mapper.
    pub fn new(codec: Arc<Codec>) -> Self {
        Self {
            base: BaseMapper::new(ACCOUNT_MAPPER_NAME, codec),
            _account: PhantomData,
        }
    }

    /// Fresh account for `addr` (not stored).
    pub fn new_account_with_address(&self, addr: Address) -> A {
        A::with_address(addr)
    }

    /// Stored account.
    pub fn get_account(&self, addr: &Address) -> Result<Option<A>, MapperError> {
        self.base.get(&address_store_key(addr))
    }

    /// Store an account under its address.
    pub fn set_account(&self, acc: &A) -> Result<(), MapperError> {
        self.base.set(&address_store_key(&acc.address()), acc)
    }

    /// Visit accounts in address order until `process` returns true.
    pub fn iterate_accounts<F>(&self, mut process: F) -> Result<(), MapperError>
    where
        F: FnMut(&A) -> bool,
    {
        for (_, acc) in self.base.iterate_prefix::<A>(ACCOUNT_STORE_KEY.as_bytes())? {
            if process(&acc) {
                break;
            }
        }
        Ok(())
    }

    fn require(&self, addr: &Address) -> Result<A, TxError> {
        self.get_account(addr)?
            .ok_or_else(|| TxError::UnknownAddress(addr.to_string()))
    }

    /// Stored key of `addr`.
    pub fn get_pub_key(&self, addr: &Address) -> Result<Option<Ed25519PublicKey>, TxError> {
        Ok(self.require(addr)?.public_key())
    }

    /// Nonce of `addr`.
    pub fn get_nonce(&self, addr: &Address) -> Result<u64, TxError> {
        Ok(self.require(addr)?.nonce())
    }

    /// Overwrite the nonce of an existing account.
    pub fn set_nonce(&self, addr: &Address, nonce: u64) -> Result<(), TxError> {
        let mut acc = self.require(addr)?;
        acc.set_nonce(nonce);
        self.set_account(&acc)?;
        Ok(())
    }
}

impl<A: Account> Mapper for AccountMapper<A> {
    fn name(&self) -> &str {
        ACCOUNT_MAPPER_NAME
    }

    fn store_key(&self) -> StoreKey {
        self.base.store_key()
    }

    fn bind(&self, store: Arc<dyn KvStore>) -> Arc<dyn Mapper> {
        Arc::new(Self {
            base: self.base.bound(store),
            _account: PhantomData,
        })
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
