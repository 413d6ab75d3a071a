//! # Unspent Outputs
//!
//! [`UnspentOutput`] is the unit of value on the UTXO chain.
//! [`UnspentOutputManager`] holds the current set per address, in the stable
//! order the UTXO builder signs against.

pub mod manager;
pub mod output;

pub use manager::UnspentOutputManager;
pub use output::UnspentOutput;
