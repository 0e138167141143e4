//! DFT hot-loop benchmark.
//!
//! The full-window transform must complete well within one half-buffer
//! playback period (1024 halfwords at 48 kHz stereo ≈ 10.6 ms); this bench
//! tracks the host-side cost of the production geometry.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    clippy::indexing_slicing
)]

use criterion::{criterion_group, criterion_main, Criterion};
use spectrum::{Channel, SpectrumAnalyzer};

const N: usize = 60;

fn bench_transform(c: &mut Criterion) {
    // Production geometry: 30 bins, 8x undersampling, 1920-halfword window.
    let analyzer: SpectrumAnalyzer<N> = SpectrumAnalyzer::new(8, Channel::Left);
    let window: Vec<i16> = (0..1920).map(|i| ((i * 37) % 1000) as i16).collect();
    let mut magnitude = [0u32; N / 2];

    c.bench_function("transform_window_1920", |b| {
        b.iter(|| {
            analyzer
                .transform(std::hint::black_box(&window), &mut magnitude)
                .unwrap();
            std::hint::black_box(&magnitude);
        });
    });

    c.bench_function("transform_batch_960", |b| {
        let batch = &window[..analyzer.batch_len()];
        b.iter(|| {
            analyzer.transform_batch(std::hint::black_box(batch), &mut magnitude);
            std::hint::black_box(&magnitude);
        });
    });
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
