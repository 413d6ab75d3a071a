//! # Cumulative-Cost Fees (NEAR)
//!
//! ```text
//! basic      = basic_send × gas_price + basic_exec × gas_price × 1.01
//! additional = same shape with the additional costs, implicit receivers only
//! fee        = (basic + additional) / 10^24
//! ```
//!
//! Sending burns gas at today's price; execution happens a block later at a
//! price that may have drifted by up to 1%. The cost set is
//! `sender_is_receiver` when the two ids match case-insensitively and
//! `sender_is_not_receiver` otherwise.

use rust_decimal::Decimal;

use super::protocol_config::{CostSet, ProtocolConfig};
use super::{Fee, FeeError, FeeTier};
use crate::address::is_implicit_account;
use crate::amount::scale_factor;
use crate::config::{near_next_block_gas_multiplier, NEAR_DECIMALS};

/// Gas-denominated cost of one transfer, in yoctoNEAR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearTransferCost {
    pub basic: Decimal,
    pub additional: Decimal,
}

impl NearTransferCost {
    pub fn total(&self) -> Result<Decimal, FeeError> {
        self.basic
            .checked_add(self.additional)
            .ok_or(FeeError::Overflow)
    }
}

fn send_plus_exec(send: Decimal, exec: Decimal, gas_price: Decimal) -> Result<Decimal, FeeError> {
    let next_block_price = gas_price
        .checked_mul(near_next_block_gas_multiplier())
        .ok_or(FeeError::Overflow)?;
    send.checked_mul(gas_price)
        .zip(exec.checked_mul(next_block_price))
        .and_then(|(s, e)| s.checked_add(e))
        .ok_or(FeeError::Overflow)
}

/// Basic and additional cost for a transfer from `source` to `destination`
/// at `gas_price` yoctoNEAR per gas unit.
pub fn near_transfer_cost(
    config: &ProtocolConfig,
    gas_price: Decimal,
    source: &str,
    destination: &str,
) -> Result<NearTransferCost, FeeError> {
    let costs: &CostSet = config.cost_set(source, destination);

    let basic = send_plus_exec(
        costs.cumulative_basic_send_cost,
        costs.cumulative_basic_execution_cost,
        gas_price,
    )?;

    let additional = if is_implicit_account(destination) {
        send_plus_exec(
            costs.cumulative_additional_send_cost,
            costs.cumulative_additional_execution_cost,
            gas_price,
        )?
    } else {
        Decimal::ZERO
    };

    Ok(NearTransferCost { basic, additional })
}

/// The single NEAR fee option, in NEAR.
pub fn near_transfer_fee(
    config: &ProtocolConfig,
    gas_price: Decimal,
    source: &str,
    destination: &str,
) -> Result<Fee, FeeError> {
    let cost = near_transfer_cost(config, gas_price, source, destination)?;
    let value = cost
        .total()?
        .checked_div(scale_factor(NEAR_DECIMALS)?)
        .ok_or(FeeError::Overflow)?;
    Ok(Fee {
        tier: FeeTier::Market,
        value: value.normalize(),
    })
}
