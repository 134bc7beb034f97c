// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use canopy_layout::{AnchorOffset, Frame, HAttach, VAttach};

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchor_resolution");

    let modes = [
        HAttach::Center,
        HAttach::Left,
        HAttach::Right,
        HAttach::InsideLeft,
        HAttach::InsideRight,
    ];
    group.throughput(Throughput::Elements(modes.len() as u64));
    group.bench_function("store_and_resolve", |b| {
        let mut frame: Frame<u32> = Frame::new();
        let _ = frame.set_size(50.0, 50.0);
        b.iter(|| {
            for mode in modes {
                let _ = frame.anchor_left(
                    black_box(1),
                    black_box(mode),
                    AnchorOffset::Px(3.0),
                    black_box(100.0),
                    black_box(150.0),
                );
            }
            black_box(frame.origin())
        });
    });

    group.bench_function("reapply_stored_rules", |b| {
        let mut frame: Frame<u32> = Frame::new();
        let _ = frame.set_size(50.0, 50.0);
        let _ = frame.anchor_left(1, HAttach::Center, AnchorOffset::Px(0.0), 100.0, 150.0);
        let _ = frame.anchor_top(1, VAttach::Bottom, AnchorOffset::Fraction(0.1), 100.0, 100.0);
        b.iter(|| {
            let _ = frame.apply_h_anchor(black_box(100.0), black_box(150.0));
            let _ = frame.apply_v_anchor(black_box(100.0), black_box(100.0));
            black_box(frame.origin())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_resolution);
criterion_main!(benches);
