//! # Legacy P2PKH Addresses
//!
//! `Base58Check(0x00 ‖ HASH160(compressed_pubkey))`. Radiant inherited this
//! format unchanged, so does the checksum, and so does the rule that only
//! version `0x00` pays to a public key hash. Version `0x05` (P2SH, the `3...`
//! addresses) decodes fine but is rejected: the builders only know how to
//! satisfy a P2PKH locking script.

use std::fmt;
use std::str::FromStr;

use super::AddressError;
use crate::config::{P2PKH_ADDRESS_PAYLOAD_LENGTH, P2PKH_ADDRESS_VERSION};
use crate::crypto::Secp256k1PublicKey;

const OP_DUP: u8 = 0x76;
const OP_HASH160: u8 = 0xA9;
const OP_EQUALVERIFY: u8 = 0x88;
const OP_CHECKSIG: u8 = 0xAC;

/// A validated P2PKH address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LegacyAddress {
    hash: [u8; 20],
}

impl LegacyAddress {
    /// Address of a secp256k1 key. Always hashes the compressed form.
    pub fn from_public_key(key: &Secp256k1PublicKey) -> Self {
        Self { hash: key.hash160() }
    }

    /// Address of raw SEC1 key bytes (33 or 65).
    pub fn from_public_key_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        Ok(Self::from_public_key(&Secp256k1PublicKey::from_bytes(bytes)?))
    }

    /// Parse and validate a Base58Check string.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let payload = bs58::decode(s)
            .with_check(None)
            .into_vec()
            .map_err(|e| match e {
                bs58::decode::Error::InvalidChecksum { .. } => AddressError::InvalidChecksum,
                other => AddressError::InvalidBase58(other.to_string()),
            })?;

        if payload.len() != P2PKH_ADDRESS_PAYLOAD_LENGTH {
            return Err(AddressError::InvalidLength {
                expected: P2PKH_ADDRESS_PAYLOAD_LENGTH,
                got: payload.len(),
            });
        }
        if payload[0] != P2PKH_ADDRESS_VERSION {
            return Err(AddressError::UnsupportedVersion(payload[0]));
        }

        let mut hash = [0u8; 20];
        hash.copy_from_slice(&payload[1..]);
        Ok(Self { hash })
    }

    /// `true` if `s` parses as a P2PKH address.
    pub fn validate(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// The 20-byte public key hash.
    pub fn hash160(&self) -> &[u8; 20] {
        &self.hash
    }

    /// `OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG`, 25 bytes.
    pub fn locking_script(&self) -> Vec<u8> {
        let mut script = Vec::with_capacity(25);
        script.push(OP_DUP);
        script.push(OP_HASH160);
        script.push(20);
        script.extend_from_slice(&self.hash);
        script.push(OP_EQUALVERIFY);
        script.push(OP_CHECKSIG);
        script
    }
}

impl fmt::Display for LegacyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut payload = Vec::with_capacity(P2PKH_ADDRESS_PAYLOAD_LENGTH);
        payload.push(P2PKH_ADDRESS_VERSION);
        payload.extend_from_slice(&self.hash);
        f.write_str(&bs58::encode(payload).with_check().into_string())
    }
}

impl FromStr for LegacyAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
