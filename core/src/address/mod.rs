//! # Addresses
//!
//! Both chain families gate transaction legality on the destination string
//! before a single byte is built:
//!
//! - [`legacy`]: Base58Check P2PKH addresses for the UTXO chain, and the
//!   locking scripts they stand for.
//! - [`near`]: implicit vs. named account classification, plus the async
//!   existence check named accounts need.

pub mod legacy;
pub mod near;

use thiserror::Error;

use crate::crypto::KeyError;

pub use legacy::LegacyAddress;
pub use near::{
    classify, implicit_account_id, is_implicit_account, is_valid_named_account,
    requires_existence_check, resolve, AccountClass,
};

/// Errors from address parsing, classification and resolution.
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("invalid base58 encoding: {0}")]
    InvalidBase58(String),

    #[error("address checksum mismatch")]
    InvalidChecksum,

    #[error("invalid address length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("unsupported address version byte {0:#04x}")]
    UnsupportedVersion(u8),

    #[error("invalid account id: {0}")]
    InvalidAccountId(String),

    /// Deliberately generic. Transport details never leak through here.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error(transparent)]
    Key(#[from] KeyError),
}
