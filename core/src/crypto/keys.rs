//! # Public Keys
//!
//! Parsed, validated public keys for both curves. The wallet layer receives
//! raw bytes from the host (often straight off a hardware card), so every
//! constructor here checks that the bytes are actually a point on the curve
//! before anything downstream commits to them.
//!
//! Key bytes are public. Logging them is fine; logging anything else in this
//! neighbourhood is not.

use ed25519_dalek::VerifyingKey as Ed25519VerifyingKey;
use k256::ecdsa::VerifyingKey as Secp256k1VerifyingKey;
use std::fmt;
use thiserror::Error;

use super::hash::hash160;

/// Errors that can occur while parsing a public key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid public key length: expected {expected}, got {got}")]
    InvalidLength { expected: &'static str, got: usize },

    #[error("invalid public key bytes: not a valid {curve} point")]
    InvalidPoint { curve: &'static str },

    #[error("invalid public key encoding: {0}")]
    InvalidEncoding(String),
}

// ---------------------------------------------------------------------------
// secp256k1
// ---------------------------------------------------------------------------

/// A secp256k1 public key, accepted in compressed (33) or uncompressed (65)
/// SEC1 form and always re-emitted compressed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secp256k1PublicKey {
    inner: Secp256k1VerifyingKey,
}

impl Secp256k1PublicKey {
    /// Parse SEC1 bytes: `02`/`03` followed by x, or `04` followed by x and y.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let tag_ok = match (bytes.len(), bytes.first()) {
            (33, Some(0x02 | 0x03)) | (65, Some(0x04)) => true,
            (33 | 65, _) => false,
            (got, _) => {
                return Err(KeyError::InvalidLength {
                    expected: "33 or 65",
                    got,
                })
            }
        };
        if !tag_ok {
            return Err(KeyError::InvalidPoint { curve: "secp256k1" });
        }
        let inner = Secp256k1VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|_| KeyError::InvalidPoint { curve: "secp256k1" })?;
        Ok(Self { inner })
    }

    /// 33-byte compressed SEC1 encoding.
    pub fn compressed(&self) -> [u8; 33] {
        let point = self.inner.to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// 65-byte uncompressed SEC1 encoding.
    pub fn uncompressed(&self) -> [u8; 65] {
        let point = self.inner.to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// HASH160 of the compressed key. This is what a P2PKH script locks to.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.compressed())
    }

    /// The underlying `k256` verifying key.
    pub fn verifying_key(&self) -> &Secp256k1VerifyingKey {
        &self.inner
    }
}

impl From<Secp256k1VerifyingKey> for Secp256k1PublicKey {
    fn from(inner: Secp256k1VerifyingKey) -> Self {
        Self { inner }
    }
}

impl fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1PublicKey({})", hex::encode(self.compressed()))
    }
}

// ---------------------------------------------------------------------------
// Ed25519
// ---------------------------------------------------------------------------

/// An Ed25519 public key, as used by NEAR.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; 32]);

impl Ed25519PublicKey {
    /// Prefix of the textual NEAR key form, `ed25519:<base58>`.
    pub const NEAR_PREFIX: &'static str = "ed25519:";

    /// Parse 32 raw bytes, rejecting anything that does not decompress.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| KeyError::InvalidLength {
            expected: "32",
            got: bytes.len(),
        })?;
        Ed25519VerifyingKey::from_bytes(&arr)
            .map_err(|_| KeyError::InvalidPoint { curve: "ed25519" })?;
        Ok(Self(arr))
    }

    /// Parse the `ed25519:<base58>` form NEAR RPCs use. The prefix is optional.
    pub fn from_near_string(s: &str) -> Result<Self, KeyError> {
        let encoded = s.strip_prefix(Self::NEAR_PREFIX).unwrap_or(s);
        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| KeyError::InvalidEncoding(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex. Doubles as the implicit account id of this key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// `ed25519:<base58>`.
    pub fn to_near_string(&self) -> String {
        format!("{}{}", Self::NEAR_PREFIX, bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_near_string())
    }
}
