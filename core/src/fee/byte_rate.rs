//! # Byte-Rate Fees
//!
//! `fee = ceil(size × rate / 1000)` in base units, for each tier. The size
//! comes from [`crate::transaction::UtxoTransactionBuilder::estimate_size`],
//! which assembles the real transaction with placeholder signatures, so it
//! is exact rather than a heuristic per-input guess.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Fee, FeeError, FeeTier};
use crate::amount::{from_base_units, to_base_units, Rounding};
use crate::config::FEE_RATE_UNIT_BYTES;

/// Rates per 1000 bytes, in display units (e.g. RXD/kB).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRates {
    pub slow: Decimal,
    pub market: Decimal,
    pub priority: Decimal,
}

impl FeeRates {
    fn tiers(&self) -> [(FeeTier, Decimal); 3] {
        [
            (FeeTier::Slow, self.slow),
            (FeeTier::Market, self.market),
            (FeeTier::Priority, self.priority),
        ]
    }
}

/// Fee for `size_bytes` at `rate_per_kb`, rounded up to a whole base unit.
pub fn byte_rate_fee(
    size_bytes: usize,
    rate_per_kb: Decimal,
    decimals: u32,
    tier: FeeTier,
) -> Result<Fee, FeeError> {
    if rate_per_kb <= Decimal::ZERO {
        return Err(FeeError::UnreachableTier(tier));
    }

    let raw = Decimal::from(size_bytes as u64)
        .checked_mul(rate_per_kb)
        .and_then(|v| v.checked_div(Decimal::from(FEE_RATE_UNIT_BYTES)))
        .ok_or(FeeError::Overflow)?;

    let base_units = to_base_units(raw, decimals, Rounding::Up)?;
    Ok(Fee {
        tier,
        value: from_base_units(base_units, decimals)?,
    })
}

/// One fee per tier, slow to priority.
pub fn byte_rate_fees(
    size_bytes: usize,
    rates: &FeeRates,
    decimals: u32,
) -> Result<Vec<Fee>, FeeError> {
    rates
        .tiers()
        .into_iter()
        .map(|(tier, rate)| byte_rate_fee(size_bytes, rate, decimals, tier))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn scales_linearly_with_size() {
        let fee = byte_rate_fee(225, dec("0.01"), 8, FeeTier::Market).unwrap();
        assert_eq!(fee.value, dec("0.00225"));
        assert_eq!(fee.tier, FeeTier::Market);
    }

    #[test]
    fn rounds_up_to_a_whole_base_unit() {
        // 225 bytes at 1 photon/kB is 0.225 photons.
        let fee = byte_rate_fee(225, dec("0.00000001"), 8, FeeTier::Slow).unwrap();
        assert_eq!(fee.value, dec("0.00000001"));
    }

    #[test]
    fn one_fee_per_tier_in_order() {
        let rates = FeeRates {
            slow: dec("0.001"),
            market: dec("0.002"),
            priority: dec("0.004"),
        };
        let fees = byte_rate_fees(1000, &rates, 8).unwrap();
        let tiers: Vec<_> = fees.iter().map(|f| f.tier).collect();
        assert_eq!(tiers, vec![FeeTier::Slow, FeeTier::Market, FeeTier::Priority]);
        assert_eq!(fees[2].value, dec("0.004"));
        assert!(fees[0].value < fees[1].value && fees[1].value < fees[2].value);
    }

    #[test]
    fn non_positive_rate_is_unreachable() {
        let rates = FeeRates {
            slow: Decimal::ZERO,
            market: dec("0.002"),
            priority: dec("0.004"),
        };
        assert_eq!(
            byte_rate_fees(250, &rates, 8),
            Err(FeeError::UnreachableTier(FeeTier::Slow))
        );
    }
}
