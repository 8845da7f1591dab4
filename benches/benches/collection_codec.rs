//! Benchmarks for the collection CBOR codec and the copy-producing algorithms.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use stakecore_benchmarks::{ELEMENT_COUNTS, input_set, utxo_list, witnesses_with_resigns};
use stakecore_collections::Encoding;
use stakecore_ledger_types::{TransactionInputSet, UtxoList, VkeyWitnessSet};
#[allow(
    unused_imports,
    clippy::allow_attributes,
    reason = "used through the fixtures"
)]
use stakecore_test_utils as _;

fn bench_encode_utxo_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_utxo_list");

    for &n in ELEMENT_COUNTS {
        let list = utxo_list(n, n as u64);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("elements", n), &list, |b, list| {
            b.iter(|| black_box(list.to_cbor_bytes()).unwrap())
        });
    }

    group.finish();
}

fn bench_decode_utxo_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_utxo_list");

    for &n in ELEMENT_COUNTS {
        let bytes = utxo_list(n, n as u64).to_cbor_bytes().unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("elements", n), &bytes, |b, bytes| {
            b.iter(|| black_box(UtxoList::from_cbor_bytes(bytes)).unwrap())
        });
    }

    group.finish();
}

fn bench_decode_input_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_input_set");

    for &n in ELEMENT_COUNTS {
        for (name, encoding) in [("tagged", Encoding::TaggedSet), ("array", Encoding::Array)] {
            let bytes = input_set(n, n as u64, encoding).to_cbor_bytes().unwrap();
            group.throughput(Throughput::Elements(n as u64));
            group.bench_with_input(BenchmarkId::new(name, n), &bytes, |b, bytes| {
                b.iter(|| black_box(TransactionInputSet::from_cbor_bytes(bytes)).unwrap())
            });
        }
    }

    group.finish();
}

fn bench_decode_witness_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_witness_fold");

    for &n in ELEMENT_COUNTS {
        let bytes = witnesses_with_resigns(n, n as u64).to_cbor_bytes().unwrap();

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("elements", n), &bytes, |b, bytes| {
            b.iter(|| black_box(VkeyWitnessSet::from_cbor_bytes(bytes)).unwrap())
        });
    }

    group.finish();
}

fn bench_erase_half(c: &mut Criterion) {
    let mut group = c.benchmark_group("erase_half");

    for &n in ELEMENT_COUNTS {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("elements", n), &n, |b, &n| {
            b.iter_with_setup(
                || utxo_list(n, 7),
                |mut list| black_box(list.erase(0, n / 2)).unwrap(),
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_encode_utxo_list,
    bench_decode_utxo_list,
    bench_decode_input_set,
    bench_decode_witness_fold,
    bench_erase_half,
);
criterion_main!(benches);
