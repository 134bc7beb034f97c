// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;

use canopy_dispatch::{Dispatcher, Zorder};
use canopy_widget::{WidgetTree, spec_at};

/// An `n`×`n` grid of widgets under one root container.
fn build_grid(tree: &mut WidgetTree, n: usize, cell: f64) -> canopy_widget::WidgetId {
    let root = tree
        .insert_container(None, "root", spec_at(0.0, 0.0, n as f64 * cell, n as f64 * cell))
        .unwrap();
    for y in 0..n {
        for x in 0..n {
            let name = format!("w{x}x{y}");
            tree.insert_widget(
                Some(root),
                &name,
                spec_at(x as f64 * cell, y as f64 * cell, cell, cell),
            )
            .unwrap();
        }
    }
    root
}

fn bench_widget_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("widget_at");
    for n in [8usize, 16, 32] {
        let mut tree = WidgetTree::new();
        let root = build_grid(&mut tree, n, 10.0);
        let probes: Vec<Point> = (0..256)
            .map(|i| {
                let extent = n as f64 * 10.0;
                let t = i as f64 / 256.0;
                Point::new(t * extent, (1.0 - t) * extent)
            })
            .collect();
        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("grid_{n}x{n}"), |b| {
            b.iter(|| {
                let mut hits = 0usize;
                for pt in &probes {
                    if tree.widget_at(root, black_box(*pt)).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            });
        });
    }
    group.finish();
}

fn bench_mouse_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_mouse_move");
    for views in [1usize, 4, 16] {
        let mut tree = WidgetTree::new();
        let mut dispatcher = Dispatcher::new(&mut tree);
        for v in 0..views {
            let name = format!("view{v}");
            let root = tree
                .insert_container(None, &name, spec_at(v as f64 * 5.0, 0.0, 200.0, 200.0))
                .unwrap();
            dispatcher.add_view(root, Some(Zorder::new(v as i32)));
        }
        group.bench_function(format!("views_{views}"), |b| {
            let mut x = 0.0;
            b.iter(|| {
                x = if x > 300.0 { 0.0 } else { x + 7.0 };
                dispatcher.mouse_move(&mut tree, black_box(Point::new(x, 100.0)));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_widget_at, bench_mouse_move);
criterion_main!(benches);
