//! # Collaborator Interfaces
//!
//! The core never opens a socket. Everything it needs from a node (unspent
//! outputs, fee rates, account state, access keys, protocol costs,
//! broadcast) comes through the provider traits below, and signatures come
//! through [`signer::TransactionSigner`].
//!
//! Provider errors are `anyhow::Error`. The core logs them and passes them
//! up; it never matches on transport detail.

pub mod signer;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::crypto::Ed25519PublicKey;
use crate::fee::{FeeRates, ProtocolConfig};
use crate::utxo::UnspentOutput;

pub use signer::{sign_request, SignerError, SigningInterrupted, TransactionSigner};

/// What a node returns after accepting a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResult {
    pub hash: String,
}

/// `view_account`, reduced to what the wallet needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearAccountInfo {
    /// `false` for an implicit account nobody has funded yet.
    pub exists: bool,
    /// Balance in yoctoNEAR.
    pub amount: u128,
    pub storage_usage: u64,
}

/// `view_access_key`. Read fresh before every send and never cached: a
/// stale nonce gets the transaction rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKeyState {
    pub current_nonce: u64,
    /// Base58.
    pub recent_block_hash: String,
    pub can_be_used_for_transfer: bool,
}

/// Node access for the UTXO chain.
#[async_trait]
pub trait UtxoNetworkProvider: Send + Sync {
    async fn fetch_unspent_outputs(&self, address: &str) -> anyhow::Result<Vec<UnspentOutput>>;

    async fn fetch_fee_rates(&self) -> anyhow::Result<FeeRates>;

    async fn broadcast(&self, raw_transaction: &[u8]) -> anyhow::Result<BroadcastResult>;
}

/// Node access for NEAR.
#[async_trait]
pub trait NearNetworkProvider: Send + Sync {
    async fn fetch_account_info(&self, account_id: &str) -> anyhow::Result<NearAccountInfo>;

    async fn fetch_access_key(
        &self,
        account_id: &str,
        public_key: &Ed25519PublicKey,
    ) -> anyhow::Result<AccessKeyState>;

    /// yoctoNEAR per gas unit.
    async fn fetch_gas_price(&self) -> anyhow::Result<Decimal>;

    async fn fetch_protocol_config(&self) -> anyhow::Result<ProtocolConfig>;

    async fn broadcast(&self, signed_transaction: &[u8]) -> anyhow::Result<BroadcastResult>;
}
