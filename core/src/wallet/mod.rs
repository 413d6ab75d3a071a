//! # Wallet Managers
//!
//! The async glue. A manager owns one account's view of the chain and runs
//! the send flow end to end:
//!
//! ```text
//! fetch state ─► phase 1 ─► signer (cancellable) ─► phase 2 ─► broadcast
//! ```
//!
//! Everything between the arrows is synchronous builder code. The managers
//! are the only place the core awaits, and the only place that logs at
//! `info`.

pub mod near;
pub mod utxo;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::address::AddressError;
use crate::amount::AmountError;
use crate::fee::FeeError;
use crate::network::{SignerError, SigningInterrupted};
use crate::transaction::BuildError;

pub use near::{NearBalance, NearWalletManager};
pub use utxo::UtxoWalletManager;

/// Everything that can stop a send, fee quote or balance refresh.
#[derive(Debug, Error)]
pub enum SendError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Fee(#[from] FeeError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Signer(#[from] SignerError),

    /// Opaque transport failure from a provider.
    #[error("network error: {0}")]
    Network(#[from] anyhow::Error),

    #[error("send attempt cancelled")]
    Cancelled,

    #[error("access key cannot be used for transfers")]
    AccessKeyCannotTransfer,

    /// The account does not exist yet. Someone must send it at least
    /// `amount_to_create` before it can be used.
    #[error("account does not exist; at least {amount_to_create} is needed to create it")]
    NoAccount { amount_to_create: Decimal },
}

impl From<SigningInterrupted> for SendError {
    fn from(e: SigningInterrupted) -> Self {
        match e {
            SigningInterrupted::Cancelled => SendError::Cancelled,
            SigningInterrupted::Signer(inner) => SendError::Signer(inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_cancellation_is_not_a_signer_error() {
        assert!(matches!(
            SendError::from(SigningInterrupted::Cancelled),
            SendError::Cancelled
        ));
        assert!(matches!(
            SendError::from(SigningInterrupted::Signer(SignerError::Cancelled)),
            SendError::Signer(SignerError::Cancelled)
        ));
    }

    #[test]
    fn no_account_message_names_the_amount() {
        let err = SendError::NoAccount {
            amount_to_create: Decimal::new(182, 5),
        };
        assert!(err.to_string().contains("0.00182"));
    }
}
