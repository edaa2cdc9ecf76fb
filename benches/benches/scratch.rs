// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use understory_scratch::{Attribute, Attributes, ScratchCard};
use understory_scratch_cpu::CpuSurface;

fn mounted_card(reporting: bool, shape: &str) -> ScratchCard<CpuSurface> {
    let mut attrs = Attributes::new()
        .with(Attribute::BrushSize, "24")
        .with(Attribute::BrushShape, shape);
    if reporting {
        attrs.set(Attribute::PercentageUpdate, "");
    }
    let mut card = ScratchCard::new(CpuSurface::new(), attrs);
    card.on_mount(Size::new(400.0, 300.0));
    card
}

/// A zig-zag gesture across the card.
fn zig_zag(steps: usize) -> Vec<Point> {
    (0..steps)
        .map(|i| {
            let x = 400.0 * i as f64 / steps as f64;
            let y = if i % 2 == 0 { 40.0 } else { 260.0 };
            Point::new(x, y)
        })
        .collect()
}

fn bench_gesture(c: &mut Criterion) {
    let mut group = c.benchmark_group("scratch/gesture");
    let path = zig_zag(64);

    for reporting in [false, true] {
        for shape in ["round", "bevel"] {
            let id = BenchmarkId::new(shape, if reporting { "reporting" } else { "silent" });
            group.bench_with_input(id, &path, |b, path| {
                b.iter_batched(
                    || mounted_card(reporting, shape),
                    |mut card| {
                        card.handle_start(path[0]);
                        for &p in &path[1..] {
                            card.handle_move(p);
                        }
                        card.handle_end();
                        black_box(card);
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }

    group.finish();
}

fn bench_mount(c: &mut Criterion) {
    c.bench_function("scratch/mount_400x300", |b| {
        b.iter(|| black_box(mounted_card(false, "round")));
    });
}

criterion_group!(benches, bench_gesture, bench_mount);
criterion_main!(benches);
