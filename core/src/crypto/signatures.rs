//! # Signature Post-Processing
//!
//! Signers hand back 64-byte compact signatures, `r ‖ s`, and nothing else.
//! Each chain wants something different on the wire:
//!
//! - **UTXO inputs** want DER-encoded `(r, s)` followed by a one-byte
//!   sighash type.
//! - **EVM-style authorizations** want `r`, `s`, and a recovery parity bit
//!   that the signer never told us about. We recover it by trying both
//!   candidates against the digest and keeping the one that yields the
//!   caller's public key.
//!
//! ## Low-S
//!
//! A signature `(r, s)` and its twin `(r, n - s)` are both valid ECDSA.
//! Nodes only relay the low-`s` one, and `k256` refuses to verify or recover
//! a high-`s` signature. Every conversion here normalizes first. Note that
//! normalizing flips the recovery parity, which is why parity is always
//! recovered from the normalized form.
//!
//! ## Length
//!
//! Input must be exactly 64 bytes. A 63- or 65-byte signature is a signer
//! bug, and "fixing" it by padding or truncating would produce a valid-looking
//! signature over nothing in particular.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use thiserror::Error;

use super::keys::Secp256k1PublicKey;
use crate::config::{COMPACT_SIGNATURE_LENGTH, EVM_V_OFFSET};

/// Errors during signature post-processing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("invalid signature length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid signature: r or s is zero or not below the curve order")]
    InvalidScalar,

    #[error("no recovery id maps this signature to the given public key")]
    RecoveryFailed,
}

/// A 64-byte `r ‖ s` signature exactly as a signer returns it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CompactSignature([u8; COMPACT_SIGNATURE_LENGTH]);

impl CompactSignature {
    /// Wrap a byte slice, enforcing the 64-byte length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        let arr: [u8; COMPACT_SIGNATURE_LENGTH] =
            bytes.try_into().map_err(|_| SignatureError::InvalidLength {
                expected: COMPACT_SIGNATURE_LENGTH,
                got: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// The raw 64 bytes.
    pub fn as_bytes(&self) -> &[u8; COMPACT_SIGNATURE_LENGTH] {
        &self.0
    }

    /// First half, `r`.
    pub fn r(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.0[..32]);
        out
    }

    /// Second half, `s`, as signed (not normalized).
    pub fn s(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.0[32..]);
        out
    }

    /// Parse into a `k256` signature with `s` in the low half.
    fn normalized(&self) -> Result<Signature, SignatureError> {
        let sig = Signature::from_slice(&self.0).map_err(|_| SignatureError::InvalidScalar)?;
        Ok(sig.normalize_s().unwrap_or(sig))
    }

    /// DER encoding of the low-S form.
    pub fn to_der(&self) -> Result<Vec<u8>, SignatureError> {
        Ok(self.normalized()?.to_der().as_bytes().to_vec())
    }

    /// DER encoding followed by the sighash type byte. This is the first push
    /// of a P2PKH unlocking script.
    pub fn to_der_with_sighash(&self, sighash_type: u8) -> Result<Vec<u8>, SignatureError> {
        let mut der = self.to_der()?;
        der.push(sighash_type);
        Ok(der)
    }
}

impl TryFrom<&[u8]> for CompactSignature {
    type Error = SignatureError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl std::fmt::Debug for CompactSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompactSignature({})", hex::encode(self.0))
    }
}

/// `(r, s, parity)` for chains whose authorization structures take the
/// components separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    pub r: [u8; 32],
    /// Low-S normalized.
    pub s: [u8; 32],
    /// Recovery parity, 0 or 1.
    pub parity: u8,
}

impl RecoverableSignature {
    /// Legacy EVM `v`: 27 or 28.
    pub fn v(&self) -> u8 {
        EVM_V_OFFSET + self.parity
    }

    /// `r ‖ s ‖ v` in the 65-byte layout most EVM tooling expects.
    pub fn to_rsv_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v();
        out
    }
}

/// Split a compact signature into `(r, s, parity)`.
///
/// `digest` is the 32-byte prehash that was signed; `public_key` is the key
/// that signed it. Fails with [`SignatureError::RecoveryFailed`] if neither
/// recovery id reproduces the key, which means the signature is not over
/// this digest or not by this key.
pub fn unmarshal(
    signature: &[u8],
    public_key: &Secp256k1PublicKey,
    digest: &[u8; 32],
) -> Result<RecoverableSignature, SignatureError> {
    let compact = CompactSignature::from_slice(signature)?;
    let sig = compact.normalized()?;

    let parity = [0u8, 1]
        .into_iter()
        .find(|candidate| {
            RecoveryId::from_byte(*candidate)
                .and_then(|id| VerifyingKey::recover_from_prehash(digest, &sig, id).ok())
                .is_some_and(|recovered| &recovered == public_key.verifying_key())
        })
        .ok_or(SignatureError::RecoveryFailed)?;

    let (r, s) = sig.split_bytes();
    Ok(RecoverableSignature {
        r: r.into(),
        s: s.into(),
        parity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::sha256d;
    use k256::ecdsa::SigningKey;

    fn signing_key() -> SigningKey {
        SigningKey::from_slice(&[0x11; 32]).unwrap()
    }

    fn public_key(key: &SigningKey) -> Secp256k1PublicKey {
        Secp256k1PublicKey::from(*key.verifying_key())
    }

    fn sign(key: &SigningKey, digest: &[u8; 32]) -> (Signature, RecoveryId) {
        key.sign_prehash_recoverable(digest).unwrap()
    }

    #[test]
    fn rejects_wrong_lengths() {
        for len in [0usize, 63, 65, 72] {
            let bytes = vec![0x01u8; len];
            assert_eq!(
                CompactSignature::from_slice(&bytes),
                Err(SignatureError::InvalidLength {
                    expected: 64,
                    got: len
                })
            );
        }
    }

    #[test]
    fn zero_scalar_is_rejected() {
        let sig = CompactSignature::from_slice(&[0u8; 64]).unwrap();
        assert_eq!(sig.to_der(), Err(SignatureError::InvalidScalar));
    }

    #[test]
    fn der_round_trips_through_k256() {
        let key = signing_key();
        let digest = sha256d(b"der");
        let (sig, _) = sign(&key, &digest);
        let compact = CompactSignature::from_slice(&sig.to_bytes()).unwrap();

        let der = compact.to_der().unwrap();
        assert_eq!(der[0], 0x30);
        assert_eq!(Signature::from_der(&der).unwrap(), sig);
    }

    #[test]
    fn der_with_sighash_appends_type_byte() {
        let key = signing_key();
        let (sig, _) = sign(&key, &sha256d(b"sighash"));
        let compact = CompactSignature::from_slice(&sig.to_bytes()).unwrap();

        let plain = compact.to_der().unwrap();
        let tagged = compact.to_der_with_sighash(0x41).unwrap();
        assert_eq!(&tagged[..plain.len()], plain.as_slice());
        assert_eq!(tagged.last(), Some(&0x41));
    }

    #[test]
    fn high_s_is_normalized_before_der() {
        let key = signing_key();
        let (sig, _) = sign(&key, &sha256d(b"high-s"));
        let (r, s) = sig.split_scalars();
        let s_high: k256::Scalar = -*s.as_ref();
        let high = Signature::from_scalars(r, s_high).unwrap();
        assert!(high.normalize_s().is_some(), "constructed signature is high-S");

        let compact = CompactSignature::from_slice(&high.to_bytes()).unwrap();
        let decoded = Signature::from_der(&compact.to_der().unwrap()).unwrap();
        assert_eq!(decoded, sig);
    }

    #[test]
    fn unmarshal_recovers_signer_parity() {
        let key = signing_key();
        let digest = sha256d(b"parity");
        let (sig, recovery_id) = sign(&key, &digest);

        let rs = unmarshal(&sig.to_bytes(), &public_key(&key), &digest).unwrap();
        assert_eq!(rs.parity, recovery_id.to_byte() & 1);
        assert_eq!(rs.v(), 27 + rs.parity);
        assert_eq!(&rs.r[..], &sig.to_bytes()[..32]);
        assert_eq!(&rs.s[..], &sig.to_bytes()[32..]);

        let rsv = rs.to_rsv_bytes();
        assert_eq!(rsv[64], rs.v());
    }

    #[test]
    fn unmarshal_rejects_foreign_key() {
        let key = signing_key();
        let other = SigningKey::from_slice(&[0x22; 32]).unwrap();
        let digest = sha256d(b"foreign");
        let (sig, _) = sign(&key, &digest);

        assert_eq!(
            unmarshal(&sig.to_bytes(), &public_key(&other), &digest),
            Err(SignatureError::RecoveryFailed)
        );
    }

    #[test]
    fn unmarshal_rejects_short_signature() {
        let key = signing_key();
        let digest = sha256d(b"short");
        assert!(matches!(
            unmarshal(&[0x01; 63], &public_key(&key), &digest),
            Err(SignatureError::InvalidLength { got: 63, .. })
        ));
    }
}
