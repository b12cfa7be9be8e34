//! # QB-06 Accounts
//!
//! **Subsystem ID:** 06
//!
//! Optional account namespace. When an application registers an account
//! type, envelope signatures are bound to stored accounts: each signature
//! must come from the signer's key and commit to `nonce + 1`, and every
//! accepted envelope increments the signers' nonces.
//!
//! ## Storage
//!
//! Accounts live in namespace `acc` under `account:<address bytes>`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod account;
pub mod authenticator;
pub mod mapper;

pub use account::{Account, BaseAccount};
pub use authenticator::{AccountAuthenticator, TxAuthenticator};
pub use mapper::{
    address_store_key, build_account_store_query_path, AccountMapper, ACCOUNT_MAPPER_NAME,
    ACCOUNT_STORE_KEY,
};
