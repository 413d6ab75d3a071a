//! # Cryptographic Primitives
//!
//! Hashing, public key parsing, and signature post-processing. Note what is
//! *not* here: private keys. The core never holds signing material. It
//! computes digests, hands them to a [`crate::network::TransactionSigner`],
//! and reshapes whatever comes back.
//!
//! ## Curves
//!
//! - **secp256k1** (`k256`) for the UTXO chain and the EVM-style `(r, s, v)`
//!   unmarshal.
//! - **Ed25519** (`ed25519-dalek`) for NEAR. Only key validation happens here;
//!   NEAR signatures are 64 raw bytes that go into the envelope untouched.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{hash160, sha256, sha256d};
pub use keys::{Ed25519PublicKey, KeyError, Secp256k1PublicKey};
pub use signatures::{
    unmarshal, CompactSignature, RecoverableSignature, SignatureError,
};
