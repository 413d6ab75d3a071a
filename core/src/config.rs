//! # Protocol Configuration & Constants
//!
//! Every magic number the builders depend on lives here. Most of them are
//! consensus-level facts of the target chains, so "tuning" them produces
//! transactions that nodes reject. Change with care and with a test vector.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Chains
// ---------------------------------------------------------------------------

/// The chains this core knows how to build transactions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    /// Radiant. UTXO model of Bitcoin Cash lineage.
    Radiant,
    /// NEAR Protocol. Account model with a Borsh wire format.
    Near,
}

impl Chain {
    /// Number of decimal places between the display unit and the base unit.
    pub fn decimals(&self) -> u32 {
        match self {
            Self::Radiant => RADIANT_DECIMALS,
            Self::Near => NEAR_DECIMALS,
        }
    }

    /// Ticker shown to users.
    pub fn currency_symbol(&self) -> &'static str {
        match self {
            Self::Radiant => "RXD",
            Self::Near => "NEAR",
        }
    }

    /// `10^decimals` as a `Decimal`, the factor between display and base units.
    pub fn decimal_value(&self) -> Decimal {
        Decimal::from(10u64.pow(self.decimals().min(19)))
            * Decimal::from(10u64.pow(self.decimals().saturating_sub(19)))
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radiant => write!(f, "Radiant"),
            Self::Near => write!(f, "NEAR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Radiant (UTXO)
// ---------------------------------------------------------------------------

/// 1 RXD = 10^8 photons.
pub const RADIANT_DECIMALS: u32 = 8;

/// Transaction version written at the start of both the preimage and the
/// raw transaction.
pub const UTXO_TX_VERSION: u32 = 1;

/// Sequence number for every input. Final, no relative locktime.
pub const UTXO_SEQUENCE: u32 = 0xFFFF_FFFF;

/// Locktime for every transaction. Zero means "valid immediately".
pub const UTXO_LOCKTIME: u32 = 0;

/// `SIGHASH_ALL | SIGHASH_FORKID`. Written as 4 bytes LE in the preimage
/// and as a single byte after each DER signature.
pub const SIGHASH_ALL_FORKID: u32 = 0x41;

/// Base58Check version byte of a mainnet P2PKH address.
pub const P2PKH_ADDRESS_VERSION: u8 = 0x00;

/// Decoded P2PKH address length: version byte + 20-byte HASH160.
pub const P2PKH_ADDRESS_PAYLOAD_LENGTH: usize = 21;

/// Fee rates are quoted per this many bytes of serialized transaction.
pub const FEE_RATE_UNIT_BYTES: u64 = 1000;

/// Fill byte for the placeholder signatures used to measure transaction size.
pub const DUMMY_SIGNATURE_BYTE: u8 = 0x01;

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// Compact signature length: 32-byte `r` followed by 32-byte `s`.
/// Anything else is rejected outright. No padding, no truncation.
pub const COMPACT_SIGNATURE_LENGTH: usize = 64;

/// Offset added to the recovery parity to form the legacy EVM `v` value.
pub const EVM_V_OFFSET: u8 = 27;

// ---------------------------------------------------------------------------
// NEAR (account model)
// ---------------------------------------------------------------------------

/// 1 NEAR = 10^24 yoctoNEAR.
pub const NEAR_DECIMALS: u32 = 24;

/// Implicit account ids are exactly this many lowercase hex characters.
pub const NEAR_IMPLICIT_ACCOUNT_LENGTH: usize = 64;

/// Shortest valid named account id.
pub const NEAR_MIN_ACCOUNT_LENGTH: usize = 2;

/// Longest valid named account id.
pub const NEAR_MAX_ACCOUNT_LENGTH: usize = 64;

/// Account ids that are grammatically valid but belong to the runtime.
pub const NEAR_RESERVED_ACCOUNT_IDS: &[&str] = &["system"];

/// Storage used by a fresh implicit account with a single full-access key.
/// Existing accounts report their real usage via `view_account`.
pub const NEAR_DEFAULT_STORAGE_USAGE_BYTES: u64 = 182;

/// Gas price may drift by up to 1% per block; execution happens one block
/// after the send, so its cost is quoted at `gas_price * 1.01`.
pub fn near_next_block_gas_multiplier() -> Decimal {
    Decimal::new(101, 2)
}

// Fallback protocol costs (gas units), used when `EXPERIMENTAL_protocol_config`
// cannot be fetched. Cumulative = action receipt creation + transfer action.
// Additional = create account + add full-access key, charged only when the
// receiver is an implicit account that may not exist yet.

/// Fallback yoctoNEAR per byte of storage.
pub const NEAR_FALLBACK_STORAGE_AMOUNT_PER_BYTE: u128 = 10_000_000_000_000_000_000;

/// Fallback cumulative basic send cost (gas).
pub const NEAR_FALLBACK_BASIC_SEND_COST: u64 = 223_182_562_500;

/// Fallback cumulative basic execution cost (gas).
pub const NEAR_FALLBACK_BASIC_EXECUTION_COST: u64 = 223_182_562_500;

/// Fallback cumulative additional send cost (gas).
pub const NEAR_FALLBACK_ADDITIONAL_SEND_COST: u64 = 3_951_765_125_000;

/// Fallback cumulative additional execution cost (gas).
pub const NEAR_FALLBACK_ADDITIONAL_EXECUTION_COST: u64 = 3_951_765_125_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_per_chain() {
        assert_eq!(Chain::Radiant.decimals(), 8);
        assert_eq!(Chain::Near.decimals(), 24);
    }

    #[test]
    fn decimal_value_handles_wide_scales() {
        assert_eq!(Chain::Radiant.decimal_value(), Decimal::from(100_000_000u64));
        // 10^24 does not fit in a u64, so it is assembled from two factors.
        let yocto = Decimal::from_i128_with_scale(1_000_000_000_000_000_000_000_000, 0);
        assert_eq!(Chain::Near.decimal_value(), yocto);
    }

    #[test]
    fn gas_multiplier_is_one_percent() {
        assert_eq!(near_next_block_gas_multiplier().to_string(), "1.01");
    }

    #[test]
    fn sighash_fits_in_one_byte() {
        assert!(SIGHASH_ALL_FORKID <= u8::MAX as u32);
    }

    #[test]
    fn account_length_bounds_are_consistent() {
        assert!(NEAR_MIN_ACCOUNT_LENGTH < NEAR_MAX_ACCOUNT_LENGTH);
        assert_eq!(NEAR_IMPLICIT_ACCOUNT_LENGTH, NEAR_MAX_ACCOUNT_LENGTH);
    }
}
