//! UTXO wallet: refresh outputs, quote byte-rate fees, send.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::SendError;
use crate::address::{AddressError, LegacyAddress};
use crate::config::Chain;
use crate::crypto::Secp256k1PublicKey;
use crate::fee::{byte_rate_fees, Fee};
use crate::network::{sign_request, BroadcastResult, TransactionSigner, UtxoNetworkProvider};
use crate::transaction::{
    utxo_transaction_id, BuildError, TransactionBuilder, TransferIntent, UtxoTransactionBuilder,
};
use crate::utxo::UnspentOutputManager;

/// Wallet for one P2PKH address.
pub struct UtxoWalletManager {
    chain: Chain,
    address: LegacyAddress,
    store: Arc<UnspentOutputManager>,
    builder: UtxoTransactionBuilder,
    provider: Arc<dyn UtxoNetworkProvider>,
}

impl UtxoWalletManager {
    /// Wallet for the address of `public_key` (SEC1, 33 or 65 bytes).
    pub fn new(
        chain: Chain,
        public_key: &[u8],
        provider: Arc<dyn UtxoNetworkProvider>,
    ) -> Result<Self, SendError> {
        let key = Secp256k1PublicKey::from_bytes(public_key).map_err(AddressError::from)?;
        let address = LegacyAddress::from_public_key(&key);
        let store = Arc::new(UnspentOutputManager::new(chain.decimals()));
        let builder = UtxoTransactionBuilder::new(key, chain.decimals(), Arc::clone(&store));

        Ok(Self {
            chain,
            address,
            store,
            builder,
            provider,
        })
    }

    pub fn address(&self) -> String {
        self.address.to_string()
    }

    pub fn store(&self) -> &Arc<UnspentOutputManager> {
        &self.store
    }

    /// Replace the unspent set with the network's and return the balance.
    pub async fn update(&self) -> Result<Decimal, SendError> {
        let address = self.address();
        let outputs = self.provider.fetch_unspent_outputs(&address).await?;
        debug!(
            chain = %self.chain,
            %address,
            outputs = outputs.len(),
            "unspent outputs refreshed"
        );

        self.store.update(&address, outputs);
        Ok(self.store.balance())
    }

    /// One fee per network tier for sending `amount` to `destination`.
    pub async fn get_fee(
        &self,
        amount: Decimal,
        destination: &str,
    ) -> Result<Vec<Fee>, SendError> {
        let rates = self.provider.fetch_fee_rates().await?;
        let intent = TransferIntent::new(amount, Decimal::ZERO, self.address(), destination);
        let size = self.builder.estimate_size(&intent)?;
        debug!(size, "estimated transaction size");

        Ok(byte_rate_fees(size, &rates, self.chain.decimals())?)
    }

    /// Build, sign and broadcast. The store must not change while this runs.
    ///
    /// `intent.source` must be this wallet's address.
    pub async fn send(
        &self,
        intent: &TransferIntent,
        signer: &dyn TransactionSigner,
        cancel: &CancellationToken,
    ) -> Result<BroadcastResult, SendError> {
        if cancel.is_cancelled() {
            return Err(SendError::Cancelled);
        }
        let address = self.address();
        if intent.source != address {
            return Err(BuildError::InvalidParams(format!(
                "source {} is not this wallet's address {address}",
                intent.source
            ))
            .into());
        }

        let request = self.builder.build_for_sign(intent, &())?;
        let signatures = sign_request(signer, &request, cancel).await?;
        let raw = self.builder.build_for_send(intent, &(), &signatures)?;

        if cancel.is_cancelled() {
            return Err(SendError::Cancelled);
        }

        let txid = utxo_transaction_id(&raw);
        let result = self.provider.broadcast(&raw).await?;
        info!(
            chain = %self.chain,
            %txid,
            hash = %result.hash,
            bytes = raw.len(),
            "transaction broadcast"
        );
        Ok(result)
    }
}
