// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # TXKit Core: Transaction Construction & Signing
//!
//! This crate turns an abstract "send X to Y" intent into bytes a node will
//! accept. It covers two chain families that could hardly be more different:
//!
//! - **UTXO** (Radiant): spend a set of unspent outputs, commit to every
//!   input and output in a per-input sighash preimage, and stitch DER
//!   signatures back into a raw transaction.
//! - **Account model** (NEAR): bump a nonce, Borsh-encode a single transfer
//!   action, hash it, and wrap the signature into a signed envelope.
//!
//! Everything between "digest" and "signature" is somebody else's problem:
//! the signer is an opaque async capability (a hardware card, a software key,
//! a remote service). The core hands out digests and takes signatures back.
//!
//! ## Architecture
//!
//! - **encoding**: Little-endian integers, compact size, script pushes.
//! - **crypto**: Hashes, public keys, signature post-processing.
//! - **address**: Legacy P2PKH codec and NEAR account classification.
//! - **amount**: Display ↔ base unit conversion with explicit rounding.
//! - **utxo**: The unspent output store, ordered and lock-protected.
//! - **transaction**: Two-phase builders for both chain families.
//! - **fee**: Byte-rate and cumulative-cost fee models.
//! - **network**: Collaborator traits: providers and the signer.
//! - **wallet**: Async send flows gluing the above together.
//! - **config**: Protocol constants. Every magic number lives there.
//! - **logging**: `tracing` subscriber setup.
//!
//! ## Ground Rules
//!
//! 1. Digest computation and byte assembly are synchronous and pure.
//! 2. Phase 1 and phase 2 must agree bit-for-bit. They share one code path.
//! 3. No floating point near money. `Decimal` for display units, integers
//!    for base units.
//! 4. Errors are typed. Transport errors stay opaque.

pub mod address;
pub mod amount;
pub mod config;
pub mod crypto;
pub mod encoding;
pub mod fee;
pub mod logging;
pub mod network;
pub mod transaction;
pub mod utxo;
pub mod wallet;
