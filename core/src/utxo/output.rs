//! A single spendable output.

use std::fmt;

use crate::encoding::{reversed, write_u32_le};

/// One unspent output, identified by `(transaction_hash, output_index)`.
///
/// `transaction_hash` is kept in display order, the way explorers and RPCs
/// print it. The wire format wants it reversed; [`UnspentOutput::outpoint`]
/// takes care of that.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UnspentOutput {
    pub transaction_hash: [u8; 32],
    pub output_index: u32,
    /// Base units.
    pub amount: u64,
    pub locking_script: Vec<u8>,
    pub owner_address: String,
}

impl UnspentOutput {
    /// Build from the hex hash an RPC hands back.
    pub fn from_hex_hash(
        transaction_hash: &str,
        output_index: u32,
        amount: u64,
        locking_script: Vec<u8>,
        owner_address: impl Into<String>,
    ) -> Result<Self, hex::FromHexError> {
        let mut hash = [0u8; 32];
        hex::decode_to_slice(transaction_hash, &mut hash)?;
        Ok(Self {
            transaction_hash: hash,
            output_index,
            amount,
            locking_script,
            owner_address: owner_address.into(),
        })
    }

    /// `(transaction_hash, output_index)`.
    pub fn id(&self) -> ([u8; 32], u32) {
        (self.transaction_hash, self.output_index)
    }

    /// 36-byte wire outpoint: reversed hash then index LE.
    pub fn outpoint(&self) -> [u8; 36] {
        let mut buf = Vec::with_capacity(36);
        buf.extend_from_slice(&reversed(&self.transaction_hash));
        write_u32_le(&mut buf, self.output_index);
        let mut out = [0u8; 36];
        out.copy_from_slice(&buf);
        out
    }
}

impl fmt::Debug for UnspentOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnspentOutput")
            .field("outpoint", &format_args!("{}:{}", hex::encode(self.transaction_hash), self.output_index))
            .field("amount", &self.amount)
            .field("owner_address", &self.owner_address)
            .finish()
    }
}
