//! # Signer Boundary
//!
//! The one suspension point that can take arbitrarily long: a hardware card
//! may be waiting for the user to tap it. [`sign_request`] races the signer
//! against a [`CancellationToken`] so that a send can be abandoned at any
//! moment without leaving anything behind.

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::transaction::SigningRequest;

/// Errors reported by the signer itself. Propagated verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    #[error("signing cancelled by user")]
    Cancelled,

    #[error("signing device error: {0}")]
    Device(String),
}

/// Anything that can sign 32-byte digests with the key behind `public_key`.
///
/// Implementations must return exactly one 64-byte compact signature per
/// digest, in request order. Builders reject anything else.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn sign(
        &self,
        digests: &[[u8; 32]],
        public_key: &[u8],
    ) -> Result<Vec<Vec<u8>>, SignerError>;
}

/// Outcome of [`sign_request`] when it does not produce signatures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningInterrupted {
    #[error("send attempt cancelled")]
    Cancelled,

    #[error(transparent)]
    Signer(#[from] SignerError),
}

/// Ask `signer` for signatures over `request`, unless `cancel` fires first.
pub async fn sign_request<S>(
    signer: &S,
    request: &SigningRequest,
    cancel: &CancellationToken,
) -> Result<Vec<Vec<u8>>, SigningInterrupted>
where
    S: TransactionSigner + ?Sized,
{
    debug!(digests = request.len(), "requesting signatures");

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SigningInterrupted::Cancelled),
        result = signer.sign(&request.digests, &request.public_key) => Ok(result?),
    }
}
