//! # NEAR Wallet
//!
//! Balance refresh with storage reserve, cumulative-cost fees, account
//! resolution, and the send flow.
//!
//! ## Reserve
//!
//! Every byte an account occupies locks `storage_amount_per_byte` yocto.
//! That part of the balance cannot be sent, so the spendable balance is
//! `amount - storage_usage × storage_amount_per_byte`, floored at zero.
//!
//! ## Missing accounts
//!
//! An implicit account does not exist until someone funds it. Refreshing one
//! that does not exist yet reports [`SendError::NoAccount`] with the minimum
//! needed to create it (182 bytes of storage for a single full-access key).

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::SendError;
use crate::address::{implicit_account_id, resolve};
use crate::amount::{from_base_units, scale_factor};
use crate::config::{NEAR_DECIMALS, NEAR_DEFAULT_STORAGE_USAGE_BYTES};
use crate::crypto::Ed25519PublicKey;
use crate::fee::{near_transfer_fee, Fee, FeeError, ProtocolConfig, ProtocolConfigCache};
use crate::network::{sign_request, BroadcastResult, NearNetworkProvider, TransactionSigner};
use crate::transaction::{
    BuildError, NearTransactionBuilder, NearTransactionParams, TransactionBuilder,
    TransferIntent,
};

/// Balance split into what is locked for storage and what can be spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearBalance {
    pub total: Decimal,
    pub reserve: Decimal,
    pub available: Decimal,
}

/// Wallet for one NEAR account.
pub struct NearWalletManager {
    public_key: Ed25519PublicKey,
    account_id: String,
    builder: NearTransactionBuilder,
    provider: Arc<dyn NearNetworkProvider>,
    protocol_config: Arc<ProtocolConfigCache>,
}

impl NearWalletManager {
    /// Wallet for the implicit account of `public_key`.
    pub fn new(
        public_key: Ed25519PublicKey,
        provider: Arc<dyn NearNetworkProvider>,
        protocol_config: Arc<ProtocolConfigCache>,
    ) -> Self {
        Self {
            account_id: implicit_account_id(&public_key),
            public_key,
            builder: NearTransactionBuilder::new(),
            provider,
            protocol_config,
        }
    }

    /// Use a named account controlled by the same key instead.
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    async fn protocol_config(&self) -> ProtocolConfig {
        self.protocol_config.get_or_fetch(self.provider.as_ref()).await
    }

    /// `bytes × storage_amount_per_byte`, in NEAR.
    fn storage_cost(config: &ProtocolConfig, bytes: u64) -> Result<Decimal, SendError> {
        Decimal::from(bytes)
            .checked_mul(config.storage_amount_per_byte)
            .and_then(|yocto| yocto.checked_div(scale_factor(NEAR_DECIMALS).ok()?))
            .map(|near| near.normalize())
            .ok_or_else(|| FeeError::Overflow.into())
    }

    /// Refresh the balance. A missing account is an error carrying the
    /// amount needed to create it.
    pub async fn update(&self) -> Result<NearBalance, SendError> {
        let info = self.provider.fetch_account_info(&self.account_id).await?;
        let config = self.protocol_config().await;

        if !info.exists {
            let amount_to_create = Self::storage_cost(&config, NEAR_DEFAULT_STORAGE_USAGE_BYTES)?;
            debug!(account_id = %self.account_id, %amount_to_create, "account not created yet");
            return Err(SendError::NoAccount { amount_to_create });
        }

        let total = from_base_units(info.amount, NEAR_DECIMALS)?;
        let reserve = Self::storage_cost(&config, info.storage_usage)?;
        let available = (total - reserve).max(Decimal::ZERO);

        Ok(NearBalance {
            total,
            reserve,
            available,
        })
    }

    /// The fee for a transfer to `destination`.
    pub async fn get_fee(&self, destination: &str) -> Result<Fee, SendError> {
        let gas_price = self.provider.fetch_gas_price().await?;
        let config = self.protocol_config().await;
        Ok(near_transfer_fee(
            &config,
            gas_price,
            &self.account_id,
            destination,
        )?)
    }

    /// Confirm `account_id` is a legal destination.
    pub async fn resolve(&self, account_id: &str) -> Result<String, SendError> {
        Ok(resolve(account_id, self.provider.as_ref()).await?)
    }

    /// Build, sign and broadcast. The access key is read fresh every time.
    ///
    /// `intent.source` must be this wallet's account id.
    pub async fn send(
        &self,
        intent: &TransferIntent,
        signer: &dyn TransactionSigner,
        cancel: &CancellationToken,
    ) -> Result<BroadcastResult, SendError> {
        if cancel.is_cancelled() {
            return Err(SendError::Cancelled);
        }
        if intent.source != self.account_id {
            return Err(BuildError::InvalidParams(format!(
                "source {} is not this wallet's account {}",
                intent.source, self.account_id
            ))
            .into());
        }

        let access_key = self
            .provider
            .fetch_access_key(&intent.source, &self.public_key)
            .await?;
        if !access_key.can_be_used_for_transfer {
            return Err(SendError::AccessKeyCannotTransfer);
        }

        let params = NearTransactionParams {
            public_key: self.public_key,
            current_nonce: access_key.current_nonce,
            recent_block_hash: access_key.recent_block_hash,
        };

        let request = self.builder.build_for_sign(intent, &params)?;
        let signatures = sign_request(signer, &request, cancel).await?;
        let signed = self.builder.build_for_send(intent, &params, &signatures)?;

        if cancel.is_cancelled() {
            return Err(SendError::Cancelled);
        }

        let result = self.provider.broadcast(&signed).await?;
        info!(
            account_id = %intent.source,
            receiver_id = %intent.destination,
            hash = %result.hash,
            "near transaction broadcast"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn storage_cost_in_near() {
        let config = ProtocolConfig::fallback();
        assert_eq!(
            NearWalletManager::storage_cost(&config, 182).unwrap(),
            Decimal::from_str("0.00182").unwrap()
        );
    }
}
