use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use vision_pipeline_core::{Point2, Target};
use vision_pipeline_filters::{
    AreaFilter, AreaSort, CircleFilter, FilterChain, PolygonFilter, RotatedRectangleFilter,
};

fn polygon(cx: f32, cy: f32, radius: f32, sides: usize) -> Target {
    Target::from_subpixel((0..sides).map(|k| {
        let a = k as f32 * std::f32::consts::TAU / sides as f32;
        Point2::new(cx + radius * a.cos(), cy + radius * a.sin())
    }))
}

fn frame_targets() -> Vec<Target> {
    (0..40)
        .map(|i| {
            let sides = [4, 6, 64][i % 3];
            polygon(20.0 + 7.0 * i as f32, 120.0, 8.0 + i as f32, sides)
        })
        .collect()
}

fn bench_filter_chain(c: &mut Criterion) {
    let targets = frame_targets();

    let circles = FilterChain::new()
        .with(AreaFilter::default())
        .with(CircleFilter::default())
        .with(AreaSort::default());
    c.bench_function("circle_chain_40_targets", |b| {
        b.iter(|| circles.apply(black_box(targets.clone())))
    });

    let shapes = FilterChain::new()
        .with(AreaFilter::default())
        .with(RotatedRectangleFilter::default());
    c.bench_function("rotated_rectangle_chain_40_targets", |b| {
        b.iter(|| shapes.apply(black_box(targets.clone())))
    });

    let hexagons = FilterChain::new().with(PolygonFilter::default());
    c.bench_function("polygon_filter_40_targets", |b| {
        b.iter(|| hexagons.apply(black_box(targets.clone())))
    });
}

criterion_group!(benches, bench_filter_chain);
criterion_main!(benches);
