// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_scratch::coverage::{Channel, channel_values, sample_coverage};

/// An RGBA buffer where every third pixel has been erased.
fn partially_cleared(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = vec![255_u8; width * height * 4];
    for px in pixels.chunks_exact_mut(4).step_by(3) {
        px.fill(0);
    }
    pixels
}

fn bench_sample_coverage(c: &mut Criterion) {
    let mut group = c.benchmark_group("coverage/sample");

    for (width, height) in [(300usize, 150usize), (800, 600), (1_920, 1_080)] {
        let pixels = partially_cleared(width, height);
        group.throughput(Throughput::Bytes(pixels.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &pixels,
            |b, pixels| b.iter(|| black_box(sample_coverage(black_box(pixels)))),
        );
    }

    group.finish();
}

fn bench_exact_alpha_scan(c: &mut Criterion) {
    // Baseline: count every transparent pixel instead of sampling.
    let mut group = c.benchmark_group("coverage/exact");

    for (width, height) in [(300usize, 150usize), (1_920, 1_080)] {
        let pixels = partially_cleared(width, height);
        group.throughput(Throughput::Bytes(pixels.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &pixels,
            |b, pixels| {
                b.iter(|| {
                    black_box(
                        channel_values(black_box(pixels), Channel::Alpha)
                            .filter(|&a| a == 0)
                            .count(),
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sample_coverage, bench_exact_alpha_scan);
criterion_main!(benches);
