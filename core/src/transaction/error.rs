//! Construction errors. All of them are fatal to the build; none are retried.

use thiserror::Error;

use crate::address::AddressError;
use crate::amount::AmountError;
use crate::crypto::SignatureError;

/// Errors raised while building either phase of a transaction.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid amount: {0}")]
    Amount(#[from] AmountError),

    /// Inputs do not cover amount plus fee. Surfaced for user correction.
    #[error("insufficient funds: available {available}, required {required} (base units)")]
    InsufficientFunds { available: u128, required: u128 },

    #[error("no unspent outputs to spend")]
    NoUnspentOutputs,

    #[error("invalid address: {0}")]
    Address(#[from] AddressError),

    #[error("invalid signature: {0}")]
    Signature(#[from] SignatureError),

    #[error("signer returned {got} signatures for {expected} digests")]
    SignatureCountMismatch { expected: usize, got: usize },

    #[error("invalid transaction parameters: {0}")]
    InvalidParams(String),

    #[error("invalid recent block hash: {0}")]
    InvalidBlockHash(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("serialized transaction is empty")]
    EmptyPayload,
}
