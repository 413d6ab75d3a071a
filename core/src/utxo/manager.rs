//! # Unspent Output Manager
//!
//! The store behind the UTXO builder. Its one job that matters is ordering:
//! digest *i* is computed over input *i*, and signatures come back in that
//! same order. If two reads of the store between phase 1 and phase 2 disagree
//! about the order, the signatures land on the wrong inputs and the
//! transaction is garbage.
//!
//! ## Ordering rule
//!
//! - Addresses keep the slot they got on their first update.
//! - Within an address, outputs are in the order of the latest update.
//!
//! ## Updates
//!
//! `update` replaces an address's entire set. There is no delta API. A later
//! snapshot for an address supersedes everything known before, so there is
//! never any reconciling of stale against fresh outputs.
//!
//! One coarse `parking_lot::Mutex` guards the whole thing. Updates happen once
//! per network refresh; contention is not a concern.

use parking_lot::Mutex;
use rust_decimal::Decimal;

use super::output::UnspentOutput;

/// Ordered, lock-protected store of unspent outputs across addresses.
#[derive(Debug)]
pub struct UnspentOutputManager {
    decimals: u32,
    slots: Mutex<Vec<(String, Vec<UnspentOutput>)>>,
}

impl UnspentOutputManager {
    /// An empty store whose balance is scaled by `10^decimals`.
    pub fn new(decimals: u32) -> Self {
        Self {
            decimals,
            slots: Mutex::new(Vec::new()),
        }
    }

    /// Replace the full output set for `address`.
    pub fn update(&self, address: &str, outputs: Vec<UnspentOutput>) {
        let mut slots = self.slots.lock();
        match slots.iter_mut().find(|(owner, _)| owner == address) {
            Some((_, existing)) => *existing = outputs,
            None => slots.push((address.to_string(), outputs)),
        }
    }

    /// Every tracked output, in stable store order.
    pub fn all_outputs(&self) -> Vec<UnspentOutput> {
        self.slots
            .lock()
            .iter()
            .flat_map(|(_, outputs)| outputs.iter().cloned())
            .collect()
    }

    /// Outputs for one address, in update order.
    pub fn outputs_for(&self, address: &str) -> Vec<UnspentOutput> {
        self.slots
            .lock()
            .iter()
            .find(|(owner, _)| owner == address)
            .map(|(_, outputs)| outputs.clone())
            .unwrap_or_default()
    }

    /// Sum of all outputs in base units. `u128` so that no realistic set of
    /// `u64` amounts can overflow it.
    pub fn total_base_units(&self) -> u128 {
        self.slots
            .lock()
            .iter()
            .flat_map(|(_, outputs)| outputs.iter())
            .map(|output| u128::from(output.amount))
            .sum()
    }

    /// Sum of all outputs in display units.
    ///
    /// Saturates at `Decimal::MAX` past 96 bits of base units, far beyond
    /// any supply this store will see.
    pub fn balance(&self) -> Decimal {
        i128::try_from(self.total_base_units())
            .ok()
            .and_then(|total| Decimal::try_from_i128_with_scale(total, self.decimals).ok())
            .map(|balance| balance.normalize())
            .unwrap_or(Decimal::MAX)
    }

    /// `true` if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().iter().all(|(_, outputs)| outputs.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn output(tag: u8, index: u32, amount: u64, owner: &str) -> UnspentOutput {
        UnspentOutput {
            transaction_hash: [tag; 32],
            output_index: index,
            amount,
            locking_script: vec![0x76, 0xA9],
            owner_address: owner.to_string(),
        }
    }

    #[test]
    fn update_replaces_not_merges() {
        let store = UnspentOutputManager::new(8);
        store.update("a", vec![output(1, 0, 10, "a"), output(2, 0, 20, "a")]);
        store.update("a", vec![output(3, 0, 30, "a")]);

        let all = store.all_outputs();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].transaction_hash, [3; 32]);
    }

    #[test]
    fn addresses_keep_their_first_slot() {
        let store = UnspentOutputManager::new(8);
        store.update("a", vec![output(1, 0, 10, "a")]);
        store.update("b", vec![output(2, 0, 20, "b")]);
        store.update("a", vec![output(3, 0, 30, "a")]);

        let owners: Vec<_> = store
            .all_outputs()
            .into_iter()
            .map(|o| o.transaction_hash[0])
            .collect();
        assert_eq!(owners, vec![3, 2]);
    }

    #[test]
    fn enumeration_is_stable_across_reads() {
        let store = UnspentOutputManager::new(8);
        store.update("a", (0..5).map(|i| output(i, i as u32, 1, "a")).collect());
        assert_eq!(store.all_outputs(), store.all_outputs());
    }

    #[test]
    fn balance_scales_by_decimals() {
        let store = UnspentOutputManager::new(8);
        store.update("a", vec![output(1, 0, 150_000_000, "a")]);
        store.update("b", vec![output(2, 0, 25_000_000, "b")]);
        assert_eq!(store.total_base_units(), 175_000_000);
        assert_eq!(store.balance(), Decimal::from_str("1.75").unwrap());
    }

    #[test]
    fn outputs_for_unknown_address_is_empty() {
        let store = UnspentOutputManager::new(8);
        assert!(store.outputs_for("nobody").is_empty());
        assert!(store.is_empty());
        assert_eq!(store.balance(), Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn store_order_is_update_order(amounts in proptest::collection::vec(1u64..1_000_000, 1..12)) {
            let store = UnspentOutputManager::new(8);
            let outputs: Vec<_> = amounts
                .iter()
                .enumerate()
                .map(|(i, a)| output(i as u8, i as u32, *a, "a"))
                .collect();
            store.update("a", outputs.clone());
            prop_assert_eq!(store.all_outputs(), outputs);
        }
    }
}
