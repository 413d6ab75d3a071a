//! # NEAR Protocol Cost Configuration
//!
//! The runtime publishes its action costs through
//! `EXPERIMENTAL_protocol_config`. They change rarely, so the first fetch is
//! cached for the lifetime of the cache object and reused by every fee
//! calculation after it.
//!
//! Fee estimation must never fail because this lookup did. A failed fetch is
//! logged and replaced by the fallback constants in [`crate::config`], and the
//! fallback is cached like a real answer.

use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{
    NEAR_FALLBACK_ADDITIONAL_EXECUTION_COST, NEAR_FALLBACK_ADDITIONAL_SEND_COST,
    NEAR_FALLBACK_BASIC_EXECUTION_COST, NEAR_FALLBACK_BASIC_SEND_COST,
    NEAR_FALLBACK_STORAGE_AMOUNT_PER_BYTE,
};
use crate::network::NearNetworkProvider;

/// Gas costs for one direction of a transfer.
///
/// *Basic* is receipt creation plus the transfer action. *Additional* is
/// account creation plus adding a full-access key, paid when the transfer
/// lands on an implicit account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSet {
    pub cumulative_basic_send_cost: Decimal,
    pub cumulative_basic_execution_cost: Decimal,
    pub cumulative_additional_send_cost: Decimal,
    pub cumulative_additional_execution_cost: Decimal,
}

/// The subset of NEAR's runtime config that fees and reserves depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// yoctoNEAR locked per byte of account storage.
    pub storage_amount_per_byte: Decimal,
    pub sender_is_receiver: CostSet,
    pub sender_is_not_receiver: CostSet,
}

impl ProtocolConfig {
    /// Mainnet costs at the time of writing. Used when the RPC is unreachable.
    pub fn fallback() -> Self {
        let costs = CostSet {
            cumulative_basic_send_cost: Decimal::from(NEAR_FALLBACK_BASIC_SEND_COST),
            cumulative_basic_execution_cost: Decimal::from(NEAR_FALLBACK_BASIC_EXECUTION_COST),
            cumulative_additional_send_cost: Decimal::from(NEAR_FALLBACK_ADDITIONAL_SEND_COST),
            cumulative_additional_execution_cost: Decimal::from(
                NEAR_FALLBACK_ADDITIONAL_EXECUTION_COST,
            ),
        };
        Self {
            storage_amount_per_byte: Decimal::from(NEAR_FALLBACK_STORAGE_AMOUNT_PER_BYTE as u64),
            sender_is_receiver: costs,
            sender_is_not_receiver: costs,
        }
    }

    /// The cost set for a transfer, chosen by case-insensitive comparison of
    /// the two account ids.
    pub fn cost_set(&self, source: &str, destination: &str) -> &CostSet {
        if source.eq_ignore_ascii_case(destination) {
            &self.sender_is_receiver
        } else {
            &self.sender_is_not_receiver
        }
    }
}

/// Shared, lock-protected slot for the fetched [`ProtocolConfig`].
///
/// One instance per wallet session, handed to every manager that needs it.
/// Concurrent sends may both miss and both fetch; the last writer wins, and
/// either answer is valid.
#[derive(Debug, Default)]
pub struct ProtocolConfigCache {
    inner: Mutex<Option<ProtocolConfig>>,
}

impl ProtocolConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<ProtocolConfig> {
        *self.inner.lock()
    }

    pub fn set(&self, config: ProtocolConfig) {
        *self.inner.lock() = Some(config);
    }

    /// Cached config, or fetch it, or fall back. Never fails.
    pub async fn get_or_fetch<P>(&self, provider: &P) -> ProtocolConfig
    where
        P: NearNetworkProvider + ?Sized,
    {
        if let Some(config) = self.get() {
            return config;
        }

        let config = match provider.fetch_protocol_config().await {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "protocol config fetch failed, using fallback costs");
                ProtocolConfig::fallback()
            }
        };
        self.set(config);
        config
    }
}
