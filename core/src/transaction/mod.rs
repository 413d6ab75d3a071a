//! # Transaction Module
//!
//! Two-phase construction for both chain families.
//!
//! ```text
//! types.rs    TransferIntent, SigningRequest, the TransactionBuilder trait
//! error.rs    BuildError
//! utxo.rs     P2PKH spends with the extended output commitment
//! near.rs     Borsh transfers with nonce bumping
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Phase 1**: `build_for_sign(intent, params)` returns the digests.
//! 2. **Sign**: an external signer signs them, in order.
//! 3. **Phase 2**: `build_for_send(intent, params, signatures)` returns the
//!    exact broadcast bytes.
//!
//! Phase 2 re-derives everything from the same inputs rather than caching
//! phase 1 state. A cancelled send leaves nothing behind to clean up.

pub mod error;
pub mod near;
pub mod types;
pub mod utxo;

pub use error::BuildError;
pub use near::{
    Action, FunctionCallAction, NearTransaction, NearTransactionBuilder, NearTransactionParams,
    SignedNearTransaction,
};
pub use types::{SigningRequest, TransactionBuilder, TransferIntent};
pub use utxo::{utxo_transaction_id, SpendPlan, TxOutput, UtxoTransactionBuilder};
