//! Benchmarks for the tsblob codec
//!
//! Run with: cargo bench

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tsblob::{
    compress, count_steps, decode_points, decode_values, decompress, encode_points,
    encode_values, series_checksum, trace_checksum, CompressionCode, DecodeWindow, TimePoint,
    TimeStepUnit,
};

fn start_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
}

fn create_values(count: usize) -> Vec<f64> {
    (0..count).map(|i| (i as f64 * 0.1).sin() * 100.0).collect()
}

fn create_points(count: usize) -> Vec<TimePoint> {
    (0..count)
        .map(|i| {
            TimePoint::new(
                start_date() + Duration::minutes(i as i64 * 17),
                (i as f64 * 0.1).sin() * 100.0,
            )
        })
        .collect()
}

fn bench_blob_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("blob");

    for size in [1_000, 100_000] {
        let values = create_values(size);
        let points = create_points(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("encode_values_{}", size), |b| {
            b.iter(|| encode_values(black_box(&values)).unwrap())
        });

        let blob = encode_values(&values).unwrap();
        group.bench_function(format!("decode_values_{}", size), |b| {
            b.iter(|| {
                decode_values(black_box(&blob), start_date(), TimeStepUnit::Day, 1, None).unwrap()
            })
        });

        // a window over the middle fifth of the series
        let window = DecodeWindow::new(
            start_date() + Duration::days(size as i64 * 2 / 5),
            start_date() + Duration::days(size as i64 * 3 / 5),
            usize::MAX,
        )
        .unwrap();
        group.bench_function(format!("decode_values_windowed_{}", size), |b| {
            b.iter(|| {
                decode_values(
                    black_box(&blob),
                    start_date(),
                    TimeStepUnit::Day,
                    1,
                    Some(&window),
                )
                .unwrap()
            })
        });

        let pair_blob = encode_points(&points).unwrap();
        group.bench_function(format!("decode_points_{}", size), |b| {
            b.iter(|| decode_points(black_box(&pair_blob), None).unwrap())
        });
    }

    group.finish();
}

fn bench_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression");

    let blob = encode_values(&create_values(100_000)).unwrap();
    group.throughput(Throughput::Bytes(blob.len() as u64));

    for code in [CompressionCode::Deflate, CompressionCode::Lz4] {
        group.bench_function(format!("compress_{}", code), |b| {
            b.iter(|| compress(black_box(&blob), code).unwrap())
        });

        let compressed = compress(&blob, code).unwrap();
        group.bench_function(format!("decompress_{}", code), |b| {
            b.iter(|| decompress(black_box(&compressed), blob.len(), code).unwrap())
        });
    }

    group.finish();
}

fn bench_checksums(c: &mut Criterion) {
    let mut group = c.benchmark_group("checksum");

    let blob = encode_values(&create_values(100_000)).unwrap();
    group.throughput(Throughput::Bytes(blob.len() as u64));
    group.bench_function("trace_checksum_100000", |b| {
        b.iter(|| trace_checksum(1, black_box(&blob)))
    });

    let traces: Vec<(i32, [u8; 8])> = (0..500)
        .map(|n| (n, trace_checksum(n, &blob)))
        .collect();
    group.bench_function("series_checksum_500_traces", |b| {
        b.iter(|| {
            series_checksum(TimeStepUnit::Day, 1, start_date(), black_box(&traces)).unwrap()
        })
    });

    group.finish();
}

fn bench_calendar(c: &mut Criterion) {
    let mut group = c.benchmark_group("calendar");

    let a = start_date();
    let b_fixed = a + Duration::days(365 * 40);

    group.bench_function("count_steps_minute_40y", |bch| {
        bch.iter(|| count_steps(black_box(a), black_box(b_fixed), TimeStepUnit::Minute, 5).unwrap())
    });

    // month counting is iterative, cost proportional to the answer
    group.bench_function("count_steps_month_40y", |bch| {
        bch.iter(|| count_steps(black_box(a), black_box(b_fixed), TimeStepUnit::Month, 1).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_blob_codec,
    bench_compression,
    bench_checksums,
    bench_calendar
);
criterion_main!(benches);
