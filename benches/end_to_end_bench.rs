// In benches/end_to_end_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use floatzip::{compress, decompress_into, max_compressed_size, CodecMode, ElementType};

// --- Mock Data Generation ---

/// A smooth signal, the case accuracy mode is built for.
fn generate_smooth_f64(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| (i as f64 * 0.001).sin() * 250.0 + (i as f64 * 0.037).cos())
        .collect()
}

/// Values with no correlation between neighbours.
fn generate_noisy_f64(size: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..size).map(|_| rng.random_range(-1.0e3..1.0e3)).collect()
}

// --- Benchmark Suite ---

const BENCH_ELEMENTS: usize = 65536;

fn bench_codec_modes(c: &mut Criterion) {
    let datasets = [
        ("Smooth", generate_smooth_f64(BENCH_ELEMENTS)),
        ("Noisy", generate_noisy_f64(BENCH_ELEMENTS)),
    ];
    let modes = [
        ("Reversible", CodecMode::Reversible),
        ("Accuracy 1e-3", CodecMode::Accuracy { tolerance: 1e-3 }),
        ("Accuracy 1e-6", CodecMode::Accuracy { tolerance: 1e-6 }),
    ];

    let mut group = c.benchmark_group("End-to-End Float64");
    group.throughput(criterion::Throughput::Bytes((BENCH_ELEMENTS * 8) as u64));

    for (data_name, values) in &datasets {
        for (mode_name, mode) in &modes {
            let bound = max_compressed_size(ElementType::Float64, values.len(), *mode).unwrap();
            let mut output = vec![0u8; bound];
            let written = compress(values, &mut output, *mode).unwrap();
            let compressed = output[..written].to_vec();

            group.bench_function(format!("Compress {} ({})", mode_name, data_name), |b| {
                b.iter(|| black_box(compress(black_box(values), &mut output, *mode)))
            });

            let mut decoded = vec![0f64; values.len()];
            group.bench_function(format!("Decompress {} ({})", mode_name, data_name), |b| {
                b.iter(|| black_box(decompress_into(black_box(&compressed), &mut decoded)))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_codec_modes);
criterion_main!(benches);
