//! Value types shared by both builders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BuildError;

// ---------------------------------------------------------------------------
// TransferIntent
// ---------------------------------------------------------------------------

/// "Send `amount` from `source` to `destination`, paying `fee`."
///
/// Amounts are in display units (RXD, NEAR). Builders convert them to base
/// units themselves: amounts round down, fees round up. An intent is built
/// once per send attempt and never mutated; both builder phases read the
/// same one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferIntent {
    pub amount: Decimal,
    /// Fee hint. The UTXO builder subtracts it from change; the account-model
    /// builder ignores it (the chain charges gas at execution time).
    pub fee: Decimal,
    pub source: String,
    pub destination: String,
    /// Where change goes. Defaults to `source`.
    pub change_destination: String,
}

impl TransferIntent {
    /// An intent whose change returns to `source`.
    pub fn new(
        amount: Decimal,
        fee: Decimal,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        let source = source.into();
        Self {
            amount,
            fee,
            change_destination: source.clone(),
            source,
            destination: destination.into(),
        }
    }

    /// Send change somewhere other than `source`.
    pub fn with_change_destination(mut self, change_destination: impl Into<String>) -> Self {
        self.change_destination = change_destination.into();
        self
    }

    /// Same intent with a different fee. Used for size estimation.
    pub fn with_fee(&self, fee: Decimal) -> Self {
        Self {
            fee,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// SigningRequest
// ---------------------------------------------------------------------------

/// Digests a signer must sign, in order.
///
/// For the UTXO builder digest *i* belongs to input *i*. The account-model
/// builder always produces exactly one. The signer must return one signature
/// per digest, in the same order; phase 2 rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningRequest {
    pub digests: Vec<[u8; 32]>,
    /// Key the signer is expected to sign with (SEC1 compressed or Ed25519).
    pub public_key: Vec<u8>,
}

impl SigningRequest {
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// Reject a signature list whose length does not match the digests.
    pub fn check_signature_count(&self, signatures: &[Vec<u8>]) -> Result<(), BuildError> {
        check_signature_count(self.len(), signatures.len())
    }
}

/// Shared count check: a partial or padded signature list is always fatal.
pub(crate) fn check_signature_count(expected: usize, got: usize) -> Result<(), BuildError> {
    if expected == got {
        Ok(())
    } else {
        Err(BuildError::SignatureCountMismatch { expected, got })
    }
}

// ---------------------------------------------------------------------------
// Builder trait
// ---------------------------------------------------------------------------

/// The two capabilities every chain family's builder provides.
///
/// Both phases take the same `intent` and `params`. Implementations derive
/// everything from those inputs through one shared code path, so that the
/// bytes phase 2 assembles are exactly the bytes phase 1 committed to.
pub trait TransactionBuilder {
    /// Chain-specific inputs beyond the intent (nonce, block hash, ...).
    type Params;

    /// Phase 1: the digests to sign.
    fn build_for_sign(
        &self,
        intent: &TransferIntent,
        params: &Self::Params,
    ) -> Result<SigningRequest, BuildError>;

    /// Phase 2: the broadcast payload, given one signature per digest.
    fn build_for_send(
        &self,
        intent: &TransferIntent,
        params: &Self::Params,
        signatures: &[Vec<u8>],
    ) -> Result<Vec<u8>, BuildError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_defaults_to_source() {
        let intent = TransferIntent::new(Decimal::ONE, Decimal::ZERO, "src", "dst");
        assert_eq!(intent.change_destination, "src");

        let redirected = intent.with_change_destination("change");
        assert_eq!(redirected.change_destination, "change");
        assert_eq!(redirected.source, "src");
    }

    #[test]
    fn with_fee_keeps_everything_else() {
        let intent = TransferIntent::new(Decimal::ONE, Decimal::ONE, "src", "dst");
        let zero = intent.with_fee(Decimal::ZERO);
        assert_eq!(zero.fee, Decimal::ZERO);
        assert_eq!(zero.amount, intent.amount);
        assert_eq!(zero.destination, intent.destination);
    }

    #[test]
    fn signature_count_must_match() {
        let request = SigningRequest {
            digests: vec![[0u8; 32]; 2],
            public_key: vec![],
        };
        assert!(request.check_signature_count(&[vec![], vec![]]).is_ok());
        assert!(matches!(
            request.check_signature_count(&[vec![]]),
            Err(BuildError::SignatureCountMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            request.check_signature_count(&[vec![], vec![], vec![]]),
            Err(BuildError::SignatureCountMismatch { expected: 2, got: 3 })
        ));
    }
}
