// Builder benchmarks.
//
// Covers UTXO sighash computation as the input count grows (the shared
// commitments are hashed once, each input adds one preimage), the full
// two-phase UTXO build, and the NEAR Borsh digest.

use std::str::FromStr;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;

use txkit_core::address::LegacyAddress;
use txkit_core::crypto::{Ed25519PublicKey, Secp256k1PublicKey};
use txkit_core::transaction::{
    NearTransactionBuilder, NearTransactionParams, TransactionBuilder, TransferIntent,
    UtxoTransactionBuilder,
};
use txkit_core::utxo::{UnspentOutput, UnspentOutputManager};

const DESTINATION: &str = "15vkcKf7gB23wLAnZLmbVuMiiVDc1Nm4a2";

fn utxo_builder(inputs: usize) -> (UtxoTransactionBuilder, String) {
    let key = k256::ecdsa::SigningKey::from_slice(&[0x11; 32]).unwrap();
    let public_key = Secp256k1PublicKey::from(*key.verifying_key());
    let source = LegacyAddress::from_public_key(&public_key).to_string();
    let script = LegacyAddress::parse(&source).unwrap().locking_script();

    let store = Arc::new(UnspentOutputManager::new(8));
    store.update(
        &source,
        (0..inputs)
            .map(|i| UnspentOutput {
                transaction_hash: [i as u8; 32],
                output_index: i as u32,
                amount: 100_000,
                locking_script: script.clone(),
                owner_address: source.clone(),
            })
            .collect(),
    );
    (UtxoTransactionBuilder::new(public_key, 8, store), source)
}

fn bench_utxo_sighashes(c: &mut Criterion) {
    let mut group = c.benchmark_group("utxo/sighashes");

    for inputs in [1, 10, 100] {
        let (builder, source) = utxo_builder(inputs);
        let intent = TransferIntent::new(
            Decimal::new(50_000, 8),
            Decimal::new(1_000, 8),
            source,
            DESTINATION,
        );
        let plan = builder.plan(&intent).unwrap();

        group.throughput(Throughput::Elements(inputs as u64));
        group.bench_with_input(BenchmarkId::from_parameter(inputs), &plan, |b, plan| {
            b.iter(|| UtxoTransactionBuilder::sighashes(plan));
        });
    }

    group.finish();
}

fn bench_utxo_two_phase(c: &mut Criterion) {
    let (builder, source) = utxo_builder(10);
    let intent = TransferIntent::new(Decimal::new(50_000, 8), Decimal::new(1_000, 8), source, DESTINATION);
    let signatures = vec![vec![0x01; 64]; 10];

    c.bench_function("utxo/build_for_sign+send", |b| {
        b.iter(|| {
            builder.build_for_sign(&intent, &()).unwrap();
            builder.build_for_send(&intent, &(), &signatures).unwrap()
        });
    });
}

fn bench_near_digest(c: &mut Criterion) {
    let builder = NearTransactionBuilder::new();
    let signer = "b5cf12d432ee87dbc664e2700eeef72b3e814879b978bb9491e5796a63e85ee4";
    let params = NearTransactionParams {
        public_key: Ed25519PublicKey::from_bytes(&hex::decode(signer).unwrap()).unwrap(),
        current_nonce: 143_936_156_000_003,
        recent_block_hash: "5M4mFZLMT6Qe9fNpXBipmYQ6u2gk4kkzXgd1ebt1zW23".to_string(),
    };
    let intent = TransferIntent::new(
        Decimal::from_str("3.891").unwrap(),
        Decimal::ZERO,
        signer,
        "jhj909.testnet",
    );

    c.bench_function("near/build_for_sign", |b| {
        b.iter(|| builder.build_for_sign(&intent, &params).unwrap());
    });
}

criterion_group!(
    benches,
    bench_utxo_sighashes,
    bench_utxo_two_phase,
    bench_near_digest,
);
criterion_main!(benches);
