//! # UTXO Transaction Builder
//!
//! Spends *every* output in the store to one destination, with change back
//! to the change address when anything is left over. Coin selection belongs to
//! the wallet layer, which decides what the store holds.
//!
//! ## Phase 1: sighash
//!
//! For input *i* the signed preimage is:
//!
//! ```text
//! version            u32 LE
//! hashPrevouts       sha256d(outpoint_0 ‖ … ‖ outpoint_n)
//! hashSequence       sha256d(0xFFFFFFFF × n)
//! outpoint_i         reversed txid ‖ vout u32 LE
//! scriptCode         compact size ‖ source P2PKH script
//! amount_i           u64 LE
//! sequence           0xFFFFFFFF
//! hashOutputHashes   sha256d(Σ amount u64 LE ‖ sha256d(script) ‖ 0u32 ‖ [0; 32])
//! hashOutputs        sha256d(Σ amount u64 LE ‖ compact size ‖ script)
//! locktime           u32 LE
//! sighash type       u32 LE (0x41)
//! ```
//!
//! and the digest is `sha256d(preimage)`. `hashOutputHashes` is Radiant's
//! extension: each output also commits to the refs it carries, which for a
//! plain transfer is a zero count and a zero hash.
//!
//! ## Phase 2: assembly
//!
//! ```text
//! version ‖ n ‖ [outpoint ‖ push(DER ‖ 0x41) push(pubkey) ‖ sequence]×n
//!         ‖ m ‖ [amount ‖ script]×m ‖ locktime
//! ```
//!
//! Both phases run through [`UtxoTransactionBuilder::plan`]. Amounts, change
//! and input order are computed exactly once per phase by the same code, so
//! the transaction that gets assembled is the one that was signed.

use std::sync::Arc;

use tracing::debug;

use super::error::BuildError;
use super::types::{check_signature_count, SigningRequest, TransactionBuilder, TransferIntent};
use crate::address::LegacyAddress;
use crate::amount::{to_base_units, Rounding};
use crate::config::{
    COMPACT_SIGNATURE_LENGTH, DUMMY_SIGNATURE_BYTE, SIGHASH_ALL_FORKID, UTXO_LOCKTIME,
    UTXO_SEQUENCE, UTXO_TX_VERSION,
};
use crate::crypto::{sha256d, CompactSignature, Secp256k1PublicKey};
use crate::encoding::{
    push_data, reversed, write_compact_size, write_u32_le, write_u64_le, write_var_bytes,
};
use crate::utxo::{UnspentOutput, UnspentOutputManager};

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// One output of the transaction being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutput {
    pub amount: u64,
    pub locking_script: Vec<u8>,
}

/// Everything both phases need, derived once from the intent and the store.
#[derive(Debug, Clone)]
pub struct SpendPlan {
    pub inputs: Vec<UnspentOutput>,
    /// Destination first, then change if any.
    pub outputs: Vec<TxOutput>,
    /// Locking script of the source address, signed as the script code.
    pub script_code: Vec<u8>,
    pub amount: u64,
    pub fee: u64,
    pub change: u64,
}

impl SpendPlan {
    /// `true` if the plan carries a change output.
    pub fn has_change(&self) -> bool {
        self.change > 0
    }

    fn total_input(&self) -> u128 {
        self.inputs.iter().map(|i| u128::from(i.amount)).sum()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Two-phase builder for P2PKH transfers on the UTXO chain.
#[derive(Debug, Clone)]
pub struct UtxoTransactionBuilder {
    public_key: Secp256k1PublicKey,
    decimals: u32,
    store: Arc<UnspentOutputManager>,
}

impl UtxoTransactionBuilder {
    pub fn new(
        public_key: Secp256k1PublicKey,
        decimals: u32,
        store: Arc<UnspentOutputManager>,
    ) -> Self {
        Self {
            public_key,
            decimals,
            store,
        }
    }

    pub fn public_key(&self) -> &Secp256k1PublicKey {
        &self.public_key
    }

    /// Resolve amounts, change and scripts against the current store.
    pub fn plan(&self, intent: &TransferIntent) -> Result<SpendPlan, BuildError> {
        let amount = to_u64(to_base_units(intent.amount, self.decimals, Rounding::Down)?)?;
        let fee = to_u64(to_base_units(intent.fee, self.decimals, Rounding::Up)?)?;

        let inputs = self.store.all_outputs();
        if inputs.is_empty() {
            return Err(BuildError::NoUnspentOutputs);
        }

        let available: u128 = inputs.iter().map(|i| u128::from(i.amount)).sum();
        let required = u128::from(amount) + u128::from(fee);
        let change = available
            .checked_sub(required)
            .ok_or(BuildError::InsufficientFunds {
                available,
                required,
            })?;
        let change = to_u64(change)?;

        let script_code = LegacyAddress::parse(&intent.source)?.locking_script();

        let mut outputs = vec![TxOutput {
            amount,
            locking_script: LegacyAddress::parse(&intent.destination)?.locking_script(),
        }];
        if change > 0 {
            outputs.push(TxOutput {
                amount: change,
                locking_script: LegacyAddress::parse(&intent.change_destination)?
                    .locking_script(),
            });
        }

        Ok(SpendPlan {
            inputs,
            outputs,
            script_code,
            amount,
            fee,
            change,
        })
    }

    /// Per-input sighash digests, in input order.
    pub fn sighashes(plan: &SpendPlan) -> Vec<[u8; 32]> {
        let commitments = Commitments::new(plan);
        (0..plan.inputs.len())
            .map(|i| sha256d(&sighash_preimage(plan, &commitments, i)))
            .collect()
    }

    /// The exact serialized size of the transaction for `intent`, measured
    /// with a zero fee and placeholder signatures.
    pub fn estimate_size(&self, intent: &TransferIntent) -> Result<usize, BuildError> {
        let unfunded = intent.with_fee(rust_decimal::Decimal::ZERO);
        let request = self.build_for_sign(&unfunded, &())?;
        let placeholders =
            vec![vec![DUMMY_SIGNATURE_BYTE; COMPACT_SIGNATURE_LENGTH]; request.len()];
        Ok(self.build_for_send(&unfunded, &(), &placeholders)?.len())
    }

    /// `push(DER ‖ sighash) push(compressed pubkey)`.
    fn unlocking_script(&self, signature: &[u8]) -> Result<Vec<u8>, BuildError> {
        let der = CompactSignature::from_slice(signature)?
            .to_der_with_sighash(SIGHASH_ALL_FORKID as u8)?;
        let mut script = Vec::with_capacity(der.len() + 35);
        push_data(&mut script, &der);
        push_data(&mut script, &self.public_key.compressed());
        Ok(script)
    }
}

impl TransactionBuilder for UtxoTransactionBuilder {
    type Params = ();

    fn build_for_sign(
        &self,
        intent: &TransferIntent,
        _params: &(),
    ) -> Result<SigningRequest, BuildError> {
        let plan = self.plan(intent)?;
        let digests = Self::sighashes(&plan);

        debug!(
            inputs = plan.inputs.len(),
            amount = plan.amount,
            fee = plan.fee,
            change = plan.change,
            "utxo signing request built"
        );

        Ok(SigningRequest {
            digests,
            public_key: self.public_key.compressed().to_vec(),
        })
    }

    fn build_for_send(
        &self,
        intent: &TransferIntent,
        _params: &(),
        signatures: &[Vec<u8>],
    ) -> Result<Vec<u8>, BuildError> {
        let plan = self.plan(intent)?;
        check_signature_count(plan.inputs.len(), signatures.len())?;

        let unlocking_scripts = signatures
            .iter()
            .map(|sig| self.unlocking_script(sig))
            .collect::<Result<Vec<_>, _>>()?;

        debug_assert_eq!(
            plan.total_input(),
            u128::from(plan.amount) + u128::from(plan.fee) + u128::from(plan.change)
        );

        Ok(serialize_transaction(&plan, &unlocking_scripts))
    }
}

// ---------------------------------------------------------------------------
// Preimage and serialization
// ---------------------------------------------------------------------------

/// The hashes shared by every input's preimage.
struct Commitments {
    prevouts: [u8; 32],
    sequences: [u8; 32],
    output_hashes: [u8; 32],
    outputs: [u8; 32],
}

impl Commitments {
    fn new(plan: &SpendPlan) -> Self {
        let mut prevouts = Vec::with_capacity(36 * plan.inputs.len());
        let mut sequences = Vec::with_capacity(4 * plan.inputs.len());
        for input in &plan.inputs {
            prevouts.extend_from_slice(&input.outpoint());
            write_u32_le(&mut sequences, UTXO_SEQUENCE);
        }

        let mut output_hashes = Vec::new();
        let mut outputs = Vec::new();
        for output in &plan.outputs {
            write_u64_le(&mut output_hashes, output.amount);
            output_hashes.extend_from_slice(&sha256d(&output.locking_script));
            // Zero refs: count, then the 32-byte refs hash.
            write_u32_le(&mut output_hashes, 0);
            output_hashes.extend_from_slice(&[0u8; 32]);

            write_output(&mut outputs, output);
        }

        Self {
            prevouts: sha256d(&prevouts),
            sequences: sha256d(&sequences),
            output_hashes: sha256d(&output_hashes),
            outputs: sha256d(&outputs),
        }
    }
}

fn sighash_preimage(plan: &SpendPlan, commitments: &Commitments, index: usize) -> Vec<u8> {
    let input = &plan.inputs[index];
    let mut buf = Vec::with_capacity(4 + 32 + 32 + 36 + 26 + 8 + 4 + 32 + 32 + 4 + 4);

    write_u32_le(&mut buf, UTXO_TX_VERSION);
    buf.extend_from_slice(&commitments.prevouts);
    buf.extend_from_slice(&commitments.sequences);
    buf.extend_from_slice(&input.outpoint());
    write_var_bytes(&mut buf, &plan.script_code);
    write_u64_le(&mut buf, input.amount);
    write_u32_le(&mut buf, UTXO_SEQUENCE);
    buf.extend_from_slice(&commitments.output_hashes);
    buf.extend_from_slice(&commitments.outputs);
    write_u32_le(&mut buf, UTXO_LOCKTIME);
    write_u32_le(&mut buf, SIGHASH_ALL_FORKID);

    buf
}

fn write_output(buf: &mut Vec<u8>, output: &TxOutput) {
    write_u64_le(buf, output.amount);
    write_var_bytes(buf, &output.locking_script);
}

fn serialize_transaction(plan: &SpendPlan, unlocking_scripts: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = Vec::new();

    write_u32_le(&mut buf, UTXO_TX_VERSION);

    write_compact_size(&mut buf, plan.inputs.len() as u64);
    for (input, script) in plan.inputs.iter().zip(unlocking_scripts) {
        buf.extend_from_slice(&input.outpoint());
        write_var_bytes(&mut buf, script);
        write_u32_le(&mut buf, UTXO_SEQUENCE);
    }

    write_compact_size(&mut buf, plan.outputs.len() as u64);
    for output in &plan.outputs {
        write_output(&mut buf, output);
    }

    write_u32_le(&mut buf, UTXO_LOCKTIME);
    buf
}

fn to_u64(value: u128) -> Result<u64, BuildError> {
    u64::try_from(value).map_err(|_| {
        BuildError::InvalidParams(format!("{value} base units exceed the u64 output range"))
    })
}

/// Transaction id of a raw transaction: `sha256d` reversed, as hex.
pub fn utxo_transaction_id(raw: &[u8]) -> String {
    hex::encode(reversed(&sha256d(raw)))
}
