//! # Hashing Utilities
//!
//! Three hashes cover both chains:
//!
//! - **SHA-256** for the NEAR transaction digest.
//! - **SHA-256d** (`sha256(sha256(x))`) for every UTXO commitment: the
//!   prevouts, sequence and outputs hashes, the per-output script hash, the
//!   final sighash, and transaction ids.
//! - **HASH160** (`ripemd160(sha256(x))`) for P2PKH addresses.
//!
//! All of them return fixed-size arrays. Callers chain them and copy them
//! into preimages, so a heap allocation per hash buys nothing.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Double SHA-256: `sha256(sha256(data))`.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// `ripemd160(sha256(data))`, the 20-byte hash inside a P2PKH address.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(sha256(data));
    hasher.finalize().into()
}
