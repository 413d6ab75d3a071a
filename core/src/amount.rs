//! # Display Units ↔ Base Units
//!
//! Users think in RXD and NEAR; chains count photons and yoctoNEAR. Every
//! crossing between the two goes through here.
//!
//! `Decimal` has a 96-bit mantissa, about 7.9 × 10^28. A NEAR balance of
//! 100k tokens is already 10^29 yocto, so a naive `value * 10^24` overflows
//! for perfectly ordinary accounts. Both directions therefore split the value
//! into whole and fractional parts and only ever scale the fraction.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors converting between display and base units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount must not be negative: {0}")]
    Negative(Decimal),

    #[error("amount {value} does not fit in base units at {decimals} decimals")]
    Overflow { value: Decimal, decimals: u32 },

    #[error("unsupported decimal scale {0}")]
    UnsupportedScale(u32),
}

/// Which way to round the sub-base-unit remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Amounts sent: never send more than asked.
    Down,
    /// Fees: never pay less than quoted.
    Up,
}

/// `10^decimals` as an integer.
fn pow10(decimals: u32) -> Result<u128, AmountError> {
    10u128
        .checked_pow(decimals)
        .ok_or(AmountError::UnsupportedScale(decimals))
}

/// `10^decimals` as a `Decimal`. Fails above 28 decimals.
pub fn scale_factor(decimals: u32) -> Result<Decimal, AmountError> {
    let factor = pow10(decimals)?;
    i128::try_from(factor)
        .ok()
        .and_then(|f| Decimal::try_from_i128_with_scale(f, 0).ok())
        .ok_or(AmountError::UnsupportedScale(decimals))
}

/// Convert a display amount to base units.
pub fn to_base_units(value: Decimal, decimals: u32, rounding: Rounding) -> Result<u128, AmountError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AmountError::Negative(value));
    }
    let overflow = || AmountError::Overflow { value, decimals };

    let whole = value.trunc().to_u128().ok_or_else(overflow)?;
    let fraction = value
        .fract()
        .checked_mul(scale_factor(decimals)?)
        .ok_or_else(overflow)?;
    let fraction = match rounding {
        Rounding::Down => fraction.floor(),
        Rounding::Up => fraction.ceil(),
    }
    .to_u128()
    .ok_or_else(overflow)?;

    whole
        .checked_mul(pow10(decimals)?)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(overflow)
}

/// Convert base units to a display amount.
///
/// Values whose full precision exceeds 28 significant digits lose their
/// least significant digits. Balances are for display; nothing signs them.
pub fn from_base_units(units: u128, decimals: u32) -> Result<Decimal, AmountError> {
    let factor = pow10(decimals)?;
    let whole = units / factor;
    let fraction = units % factor;

    let whole = i128::try_from(whole)
        .ok()
        .and_then(|w| Decimal::try_from_i128_with_scale(w, 0).ok())
        .ok_or(AmountError::UnsupportedScale(decimals))?;
    let fraction = i128::try_from(fraction)
        .ok()
        .and_then(|f| Decimal::try_from_i128_with_scale(f, decimals).ok())
        .ok_or(AmountError::UnsupportedScale(decimals))?;

    whole
        .checked_add(fraction)
        .map(|d| d.normalize())
        .ok_or(AmountError::UnsupportedScale(decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn floors_amounts_and_ceils_fees() {
        assert_eq!(to_base_units(dec("0.000000015"), 8, Rounding::Down), Ok(1));
        assert_eq!(to_base_units(dec("0.000000015"), 8, Rounding::Up), Ok(2));
        assert_eq!(to_base_units(dec("0.0006"), 8, Rounding::Down), Ok(60_000));
    }

    #[test]
    fn near_amounts_use_24_decimals() {
        assert_eq!(
            to_base_units(dec("3.891"), 24, Rounding::Down),
            Ok(3_891_000_000_000_000_000_000_000)
        );
    }

    #[test]
    fn large_near_balances_do_not_overflow() {
        let units = 250_000u128 * 10u128.pow(24) + 5;
        let display = from_base_units(units, 24).unwrap();
        assert_eq!(display.trunc(), Decimal::from(250_000u32));
        assert_eq!(
            to_base_units(Decimal::from(250_000u32), 24, Rounding::Down),
            Ok(250_000u128 * 10u128.pow(24))
        );
    }

    #[test]
    fn round_trips_exact_values() {
        assert_eq!(from_base_units(175_000_000, 8), Ok(dec("1.75")));
        assert_eq!(from_base_units(0, 24), Ok(Decimal::ZERO));
    }

    #[test]
    fn rejects_negative() {
        assert!(matches!(
            to_base_units(dec("-1"), 8, Rounding::Down),
            Err(AmountError::Negative(_))
        ));
    }

    #[test]
    fn rejects_unsupported_scale() {
        assert!(matches!(
            scale_factor(40),
            Err(AmountError::UnsupportedScale(40))
        ));
    }
}
