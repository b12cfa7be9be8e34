//! # Signature and Nonce Binding
//!
//! Binds each `TxStd` signature to a stored account:
//!
//! 1. one signature per unique signer
//! 2. a supplied key must hash to the signer's address
//! 3. `signature.nonce == account.nonce + 1`
//! 4. an account without a key adopts the supplied one
//! 5. the signature verifies over `build_signature_bytes(nonce + 1, from_chain)`
//!
//! Only when every signer passes are the nonces incremented and written
//! through the context's `acc` mapper. Missing accounts are created.

use crate::account::Account;
use crate::mapper::{AccountMapper, ACCOUNT_MAPPER_NAME};
use qb_03_context::Context;
use qb_04_txs::TxStd;
use shared_types::{Address, TxError};
use std::marker::PhantomData;
use tracing::debug;

/// Authentication step the application runtime calls for every `TxStd`.
pub trait TxAuthenticator: Send + Sync {
    /// Verify signatures and bump nonces. Returns the signer addresses.
    ///
    /// `from_chain_id` is the origin chain for envelopes delivered inside a
    /// `TxQcp`, empty for local envelopes.
    fn authenticate(
        &self,
        ctx: &Context,
        tx: &TxStd,
        from_chain_id: &str,
    ) -> Result<Vec<Address>, TxError>;
}

/// `TxAuthenticator` over `AccountMapper<A>`.
pub struct AccountAuthenticator<A: Account> {
    _account: PhantomData<fn() -> A>,
}

impl<A: Account> AccountAuthenticator<A> {
    /// Authenticator for account type `A`.
    pub fn new() -> Self {
        Self {
            _account: PhantomData,
        }
    }
}

impl<A: Account> Default for AccountAuthenticator<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Account> TxAuthenticator for AccountAuthenticator<A> {
    fn authenticate(
        &self,
        ctx: &Context,
        tx: &TxStd,
        from_chain_id: &str,
    ) -> Result<Vec<Address>, TxError> {
        let signers = tx.signers();
        if tx.signatures.len() != signers.len() {
            return Err(TxError::Unauthorized(format!(
                "signatures and signers not match. signatures: {}, signers: {}",
                tx.signatures.len(),
                signers.len()
            )));
        }
        if signers.is_empty() {
            return Ok(signers);
        }

        let mapper = ctx.require_mapper::<AccountMapper<A>>(ACCOUNT_MAPPER_NAME)?;
        let mut accounts = Vec::with_capacity(signers.len());
        for addr in &signers {
            let acc = match mapper.get_account(addr)? {
                Some(acc) => acc,
                None => mapper.new_account_with_address(*addr),
            };
            accounts.push(acc);
        }

        for (acc, sig) in accounts.iter_mut().zip(&tx.signatures) {
            if let Some(pk) = &sig.pubkey {
                if pk.address() != acc.address() {
                    return Err(TxError::InvalidAddress(format!(
                        "invalid address. expect: {}, got: {}",
                        acc.address(),
                        pk.address()
                    )));
                }
            }

            let expected = acc.nonce() + 1;
            if sig.nonce != expected {
                return Err(TxError::InvalidSequence(format!(
                    "invalid nonce. expect: {}, got: {}",
                    expected, sig.nonce
                )));
            }

            let key = match (acc.public_key(), sig.pubkey) {
                (Some(stored), _) => stored,
                (None, Some(supplied)) => {
                    acc.set_public_key(supplied);
                    supplied
                }
                (None, None) => {
                    return Err(TxError::InvalidPubKey(format!(
                        "no pubkey for account {}",
                        acc.address()
                    )))
                }
            };

            key.verify_bytes(
                &tx.build_signature_bytes(expected, from_chain_id),
                &sig.signature,
            )
            .map_err(|_| {
                TxError::Unauthorized(format!("signature verification failed for {}", acc.address()))
            })?;
        }

        for acc in &mut accounts {
            let next = acc.nonce() + 1;
            acc.set_nonce(next);
            mapper.set_account(acc)?;
        }
        debug!(signers = signers.len(), from = from_chain_id, "signatures verified");
        Ok(signers)
    }
}
