//! # NEAR Transaction Builder
//!
//! NEAR transactions are Borsh structs. The builder fills one in, hashes it,
//! and wraps the signature around the very same struct:
//!
//! ```text
//! Transaction {
//!     signer_id:   string          u32 LE length ‖ utf-8
//!     public_key:  PublicKey       0u8 (ed25519) ‖ [u8; 32]
//!     nonce:       u64             access key nonce + 1
//!     receiver_id: string
//!     block_hash:  [u8; 32]        base58-decoded recent block hash
//!     actions:     Vec<Action>     u32 LE count ‖ tagged actions
//! }
//!
//! digest          = sha256(borsh(Transaction))
//! SignedTransaction = Transaction ‖ 0u8 (ed25519) ‖ [u8; 64]
//! ```
//!
//! Transfers carry a single `Transfer { deposit: u128 }` action. The deposit
//! is 16 bytes little-endian, which is exactly how Borsh writes a `u128`.

use borsh::{BorshDeserialize, BorshSerialize};
use serde_json::json;
use tracing::debug;

use super::error::BuildError;
use super::types::{check_signature_count, SigningRequest, TransactionBuilder, TransferIntent};
use crate::address::{classify, AccountClass, AddressError};
use crate::amount::{to_base_units, Rounding};
use crate::config::{COMPACT_SIGNATURE_LENGTH, NEAR_DECIMALS};
use crate::crypto::{sha256, Ed25519PublicKey, SignatureError};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Borsh `PublicKey`. Only Ed25519 is produced here.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum NearPublicKey {
    Ed25519([u8; 32]),
}

/// Borsh `Signature`.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum NearSignature {
    Ed25519([u8; 64]),
}

/// A contract method call.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct FunctionCallAction {
    pub method_name: String,
    pub args: Vec<u8>,
    pub gas: u64,
    pub deposit: u128,
}

/// The leading part of NEAR's action enum. Variant order is the wire tag.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum Action {
    CreateAccount,
    DeployContract { code: Vec<u8> },
    FunctionCall(FunctionCallAction),
    Transfer { deposit: u128 },
}

impl Action {
    /// Gas attached to an NEP-141 `ft_transfer` unless the caller says otherwise.
    pub const DEFAULT_FT_TRANSFER_GAS: u64 = 30_000_000_000_000;

    /// NEP-141 `ft_transfer`. The standard requires exactly one yoctoNEAR
    /// attached as a full-access-key confirmation.
    pub fn ft_transfer(
        receiver_id: &str,
        amount: u128,
        memo: Option<&str>,
        gas: u64,
    ) -> Result<Self, BuildError> {
        let args = serde_json::to_vec(&json!({
            "receiver_id": receiver_id,
            "amount": amount.to_string(),
            "memo": memo,
        }))
        .map_err(|e| BuildError::Serialization(e.to_string()))?;

        Ok(Action::FunctionCall(FunctionCallAction {
            method_name: "ft_transfer".to_string(),
            args,
            gas,
            deposit: 1,
        }))
    }
}

/// Unsigned NEAR transaction.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct NearTransaction {
    pub signer_id: String,
    pub public_key: NearPublicKey,
    pub nonce: u64,
    pub receiver_id: String,
    pub block_hash: [u8; 32],
    pub actions: Vec<Action>,
}

impl NearTransaction {
    /// Borsh bytes. An empty result is treated as a failure.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BuildError> {
        let bytes = borsh::to_vec(self).map_err(|e| BuildError::Serialization(e.to_string()))?;
        if bytes.is_empty() {
            return Err(BuildError::EmptyPayload);
        }
        Ok(bytes)
    }

    /// `sha256(borsh(self))`.
    pub fn signing_digest(&self) -> Result<[u8; 32], BuildError> {
        Ok(sha256(&self.to_bytes()?))
    }

    /// Attach an Ed25519 signature.
    pub fn into_signed(self, signature: [u8; 64]) -> SignedNearTransaction {
        SignedNearTransaction {
            transaction: self,
            signature: NearSignature::Ed25519(signature),
        }
    }
}

/// Signed envelope, ready for `broadcast_tx_*`.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SignedNearTransaction {
    pub transaction: NearTransaction,
    pub signature: NearSignature,
}

impl SignedNearTransaction {
    pub fn to_bytes(&self) -> Result<Vec<u8>, BuildError> {
        let bytes = borsh::to_vec(self).map_err(|e| BuildError::Serialization(e.to_string()))?;
        if bytes.is_empty() {
            return Err(BuildError::EmptyPayload);
        }
        Ok(bytes)
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Per-send inputs, read fresh from the access key before every send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearTransactionParams {
    pub public_key: Ed25519PublicKey,
    /// Nonce currently stored on the access key. The transaction uses `+ 1`.
    pub current_nonce: u64,
    /// Base58 block hash, as RPCs return it.
    pub recent_block_hash: String,
}

/// Two-phase builder for NEAR transfers.
#[derive(Debug, Clone)]
pub struct NearTransactionBuilder {
    decimals: u32,
}

impl Default for NearTransactionBuilder {
    fn default() -> Self {
        Self {
            decimals: NEAR_DECIMALS,
        }
    }
}

impl NearTransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The unsigned transaction both phases serialize.
    pub fn build_transaction(
        &self,
        intent: &TransferIntent,
        params: &NearTransactionParams,
    ) -> Result<NearTransaction, BuildError> {
        for account in [&intent.source, &intent.destination] {
            if classify(account) == AccountClass::Invalid {
                return Err(AddressError::InvalidAccountId(account.clone()).into());
            }
        }

        let nonce = params.current_nonce.checked_add(1).ok_or_else(|| {
            BuildError::InvalidParams(format!("nonce {} cannot be incremented", params.current_nonce))
        })?;

        let block_hash = decode_block_hash(&params.recent_block_hash)?;
        let deposit = to_base_units(intent.amount, self.decimals, Rounding::Down)?;

        Ok(NearTransaction {
            signer_id: intent.source.clone(),
            public_key: NearPublicKey::Ed25519(*params.public_key.as_bytes()),
            nonce,
            receiver_id: intent.destination.clone(),
            block_hash,
            actions: vec![Action::Transfer { deposit }],
        })
    }
}

impl TransactionBuilder for NearTransactionBuilder {
    type Params = NearTransactionParams;

    fn build_for_sign(
        &self,
        intent: &TransferIntent,
        params: &NearTransactionParams,
    ) -> Result<SigningRequest, BuildError> {
        let transaction = self.build_transaction(intent, params)?;
        let digest = transaction.signing_digest()?;

        debug!(
            signer_id = %transaction.signer_id,
            receiver_id = %transaction.receiver_id,
            nonce = transaction.nonce,
            "near signing request built"
        );

        Ok(SigningRequest {
            digests: vec![digest],
            public_key: params.public_key.as_bytes().to_vec(),
        })
    }

    fn build_for_send(
        &self,
        intent: &TransferIntent,
        params: &NearTransactionParams,
        signatures: &[Vec<u8>],
    ) -> Result<Vec<u8>, BuildError> {
        check_signature_count(1, signatures.len())?;
        let signature: [u8; COMPACT_SIGNATURE_LENGTH] =
            signatures[0]
                .as_slice()
                .try_into()
                .map_err(|_| SignatureError::InvalidLength {
                    expected: COMPACT_SIGNATURE_LENGTH,
                    got: signatures[0].len(),
                })?;

        self.build_transaction(intent, params)?
            .into_signed(signature)
            .to_bytes()
    }
}

fn decode_block_hash(encoded: &str) -> Result<[u8; 32], BuildError> {
    if encoded.is_empty() {
        return Err(BuildError::InvalidBlockHash("empty".to_string()));
    }
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| BuildError::InvalidBlockHash(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| BuildError::InvalidBlockHash(format!("{} bytes, expected 32", b.len())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const SIGNER: &str = "b5cf12d432ee87dbc664e2700eeef72b3e814879b978bb9491e5796a63e85ee4";
    const BLOCK_HASH: &str = "5M4mFZLMT6Qe9fNpXBipmYQ6u2gk4kkzXgd1ebt1zW23";
    const UNSIGNED: &str = "400000006235636631326434333265653837646263363634653237303065656566373262336538313438373962393738626239343931653537393661363365383565653400b5cf12d432ee87dbc664e2700eeef72b3e814879b978bb9491e5796a63e85ee404df72bfe88200000e0000006a686a3930392e746573746e657440929e60e3adf1965997e06fe95c42f7ce13c8f2f3f39d0b2e3eed5170b01c1801000000030000e0b976365c88f337030000000000";
    const SIGNATURE: &str = "4bcfc300cbf8cf881acec6ebd6def025e59cac1b3e9e8d4e9a16a001ee9289fd8028f22a10697d6430526bdf808662f79dcb4f97cccce954117ea5f4c969cf03";
    const DIGEST: &str = "b000be9ad476420d384e9d5a5c6381740984bed849987b5342f4637ad93c665d";

    fn params(current_nonce: u64) -> NearTransactionParams {
        NearTransactionParams {
            public_key: Ed25519PublicKey::from_bytes(&hex::decode(SIGNER).unwrap()).unwrap(),
            current_nonce,
            recent_block_hash: BLOCK_HASH.to_string(),
        }
    }

    fn intent() -> TransferIntent {
        TransferIntent::new(
            Decimal::from_str("3.891").unwrap(),
            Decimal::ZERO,
            SIGNER,
            "jhj909.testnet",
        )
    }

    #[test]
    fn unsigned_bytes_match_known_transaction() {
        let tx = NearTransactionBuilder::new()
            .build_transaction(&intent(), &params(143_936_156_000_003))
            .unwrap();
        assert_eq!(tx.nonce, 143_936_156_000_004);
        assert_eq!(hex::encode(tx.to_bytes().unwrap()), UNSIGNED);
    }

    #[test]
    fn digest_is_sha256_of_borsh() {
        let request = NearTransactionBuilder::new()
            .build_for_sign(&intent(), &params(143_936_156_000_003))
            .unwrap();
        assert_eq!(request.len(), 1);
        assert_eq!(hex::encode(request.digests[0]), DIGEST);
        assert_eq!(hex::encode(&request.public_key), SIGNER);
    }

    #[test]
    fn signed_envelope_matches_known_transaction() {
        let signed = NearTransactionBuilder::new()
            .build_for_send(
                &intent(),
                &params(143_936_156_000_003),
                &[hex::decode(SIGNATURE).unwrap()],
            )
            .unwrap();
        assert_eq!(signed.len(), 245);
        assert_eq!(hex::encode(&signed), format!("{UNSIGNED}00{SIGNATURE}"));

        let decoded = SignedNearTransaction::try_from_slice(&signed).unwrap();
        assert_eq!(
            decoded.transaction.actions,
            vec![Action::Transfer {
                deposit: 3_891_000_000_000_000_000_000_000
            }]
        );
    }

    #[test]
    fn nonce_is_incremented() {
        let tx = NearTransactionBuilder::new()
            .build_transaction(&intent(), &params(5))
            .unwrap();
        assert_eq!(tx.nonce, 6);
    }

    #[test]
    fn nonce_overflow_is_rejected() {
        assert!(matches!(
            NearTransactionBuilder::new().build_transaction(&intent(), &params(u64::MAX)),
            Err(BuildError::InvalidParams(_))
        ));
    }

    #[test]
    fn bad_block_hash_is_rejected() {
        let mut p = params(5);
        p.recent_block_hash = "0OIl".to_string();
        assert!(matches!(
            NearTransactionBuilder::new().build_for_sign(&intent(), &p),
            Err(BuildError::InvalidBlockHash(_))
        ));

        p.recent_block_hash = bs58::encode([7u8; 16]).into_string();
        assert!(matches!(
            NearTransactionBuilder::new().build_for_sign(&intent(), &p),
            Err(BuildError::InvalidBlockHash(_))
        ));

        p.recent_block_hash = String::new();
        assert!(matches!(
            NearTransactionBuilder::new().build_for_sign(&intent(), &p),
            Err(BuildError::InvalidBlockHash(_))
        ));
    }

    #[test]
    fn invalid_receiver_is_rejected() {
        let bad = TransferIntent::new(Decimal::ONE, Decimal::ZERO, SIGNER, "WAT");
        assert!(matches!(
            NearTransactionBuilder::new().build_for_sign(&bad, &params(5)),
            Err(BuildError::Address(AddressError::InvalidAccountId(_)))
        ));
    }

    #[test]
    fn exactly_one_signature_is_required() {
        let builder = NearTransactionBuilder::new();
        let sig = hex::decode(SIGNATURE).unwrap();
        assert!(matches!(
            builder.build_for_send(&intent(), &params(5), &[]),
            Err(BuildError::SignatureCountMismatch { expected: 1, got: 0 })
        ));
        assert!(matches!(
            builder.build_for_send(&intent(), &params(5), &[sig.clone(), sig]),
            Err(BuildError::SignatureCountMismatch { expected: 1, got: 2 })
        ));
        assert!(matches!(
            builder.build_for_send(&intent(), &params(5), &[vec![0u8; 63]]),
            Err(BuildError::Signature(SignatureError::InvalidLength { got: 63, .. }))
        ));
    }

    #[test]
    fn action_tags_follow_wire_order() {
        let tag = |a: &Action| borsh::to_vec(a).unwrap()[0];
        assert_eq!(tag(&Action::CreateAccount), 0);
        assert_eq!(tag(&Action::DeployContract { code: vec![] }), 1);
        assert_eq!(
            tag(&Action::ft_transfer("bob.near", 1, None, Action::DEFAULT_FT_TRANSFER_GAS).unwrap()),
            2
        );
        assert_eq!(tag(&Action::Transfer { deposit: 0 }), 3);
    }

    #[test]
    fn ft_transfer_encodes_json_args() {
        let action =
            Action::ft_transfer("bob.near", 1_500_000, Some("invoice 7"), Action::DEFAULT_FT_TRANSFER_GAS)
                .unwrap();
        let Action::FunctionCall(call) = action else {
            panic!("expected a function call");
        };
        assert_eq!(call.method_name, "ft_transfer");
        assert_eq!(call.deposit, 1);
        let args: serde_json::Value = serde_json::from_slice(&call.args).unwrap();
        assert_eq!(args["receiver_id"], "bob.near");
        assert_eq!(args["amount"], "1500000");
        assert_eq!(args["memo"], "invoice 7");
    }

    #[test]
    fn function_call_transactions_round_trip() {
        let mut tx = NearTransactionBuilder::new()
            .build_transaction(&intent(), &params(9))
            .unwrap();
        tx.receiver_id = "usdt.tether-token.near".to_string();
        tx.actions = vec![Action::ft_transfer("bob.near", 42, None, 1).unwrap()];

        let bytes = tx.to_bytes().unwrap();
        assert_eq!(NearTransaction::try_from_slice(&bytes).unwrap(), tx);
        assert_ne!(tx.signing_digest().unwrap(), [0u8; 32]);
    }
}
