//! # Fee Models
//!
//! Two unrelated strategies, one per chain family:
//!
//! - [`byte_rate`]: UTXO chains price bytes. Fee is the serialized size
//!   times a per-kilobyte rate, once per network-reported tier.
//! - [`cumulative`]: NEAR prices actions. Fee is the protocol's cumulative
//!   send and execution gas times the gas price, with an extra account
//!   creation term when the receiver is implicit.
//!
//! [`protocol_config`] holds the cached cost constants the second strategy
//! reads, and the fallback used when they cannot be fetched.

pub mod byte_rate;
pub mod cumulative;
pub mod protocol_config;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::amount::AmountError;

pub use byte_rate::{byte_rate_fee, byte_rate_fees, FeeRates};
pub use cumulative::{near_transfer_cost, near_transfer_fee, NearTransferCost};
pub use protocol_config::{CostSet, ProtocolConfig, ProtocolConfigCache};

/// Speed tiers a wallet offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeTier {
    Slow,
    Market,
    Priority,
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slow => write!(f, "slow"),
            Self::Market => write!(f, "market"),
            Self::Priority => write!(f, "priority"),
        }
    }
}

/// One fee option, in display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub tier: FeeTier,
    pub value: Decimal,
}

/// Fee calculation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeError {
    /// The network reported no usable rate for this tier.
    #[error("fee tier {0} is unreachable: no positive rate reported")]
    UnreachableTier(FeeTier),

    #[error("fee computation overflowed")]
    Overflow,

    #[error(transparent)]
    Amount(#[from] AmountError),
}
