use criterion::{Criterion, criterion_group, criterion_main};
use fixint::Int128;
use serde::{Deserialize, Serialize};
use std::hint::black_box;

// ============================================================================
// JSON Serialization/Deserialization
// ============================================================================

fn bench_int128_serialize_json(c: &mut Criterion) {
    c.bench_function("int128_serialize_json", |b| {
        let v = Int128::from_i128(-123_456_789_012_345_678_901_234_567);
        b.iter(|| black_box(serde_json::to_string(&black_box(v)).unwrap()));
    });
}

fn bench_int128_deserialize_json(c: &mut Criterion) {
    c.bench_function("int128_deserialize_json", |b| {
        let json = r#""-123456789012345678901234567""#;
        b.iter(|| black_box(serde_json::from_str::<Int128>(black_box(json)).unwrap()));
    });
}

// ============================================================================
// Struct with Multiple Amounts (Realistic Scenario)
// ============================================================================

/// Amounts held as integers scaled by 10^18.
#[derive(Serialize, Deserialize)]
struct Trade {
    price: Int128,
    quantity: Int128,
    commission: Int128,
}

fn sample_trade() -> Trade {
    Trade {
        price: Int128::from_i128(123_450_000_000_000_000_000),
        quantity: Int128::from_i128(1_000_000_000_000_000_000_000),
        commission: Int128::from_i128(2_500_000_000_000_000_000),
    }
}

fn bench_struct_serialize_json(c: &mut Criterion) {
    c.bench_function("int128_struct_serialize_json", |b| {
        let trade = sample_trade();
        b.iter(|| black_box(serde_json::to_string(&black_box(&trade)).unwrap()));
    });
}

fn bench_struct_deserialize_json(c: &mut Criterion) {
    c.bench_function("int128_struct_deserialize_json", |b| {
        let json = serde_json::to_string(&sample_trade()).unwrap();
        b.iter(|| black_box(serde_json::from_str::<Trade>(black_box(&json)).unwrap()));
    });
}

// ============================================================================
// Bincode (Binary Serialization)
// ============================================================================

fn bench_int128_serialize_bincode(c: &mut Criterion) {
    c.bench_function("int128_serialize_bincode", |b| {
        let v = Int128::from_i128(-123_456_789_012_345_678_901_234_567);
        b.iter(|| black_box(bincode::serialize(&black_box(v)).unwrap()));
    });
}

fn bench_int128_deserialize_bincode(c: &mut Criterion) {
    c.bench_function("int128_deserialize_bincode", |b| {
        let bytes = bincode::serialize(&Int128::from_i128(-123_456_789_012_345_678_901_234_567))
            .unwrap();
        b.iter(|| black_box(bincode::deserialize::<Int128>(black_box(&bytes)).unwrap()));
    });
}

fn bench_struct_roundtrip_bincode(c: &mut Criterion) {
    c.bench_function("int128_struct_roundtrip_bincode", |b| {
        let trade = sample_trade();
        b.iter(|| {
            let bytes = bincode::serialize(&black_box(&trade)).unwrap();
            black_box(bincode::deserialize::<Trade>(&bytes).unwrap())
        });
    });
}

criterion_group!(
    benches,
    bench_int128_serialize_json,
    bench_int128_deserialize_json,
    bench_struct_serialize_json,
    bench_struct_deserialize_json,
    bench_int128_serialize_bincode,
    bench_int128_deserialize_bincode,
    bench_struct_roundtrip_bincode,
);

criterion_main!(benches);
