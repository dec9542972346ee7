use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cv_depth::prelude::*;
use image::{Rgb, RgbImage};

fn scene(x: u32, y: u32) -> Rgb<u8> {
    let v = (x.wrapping_mul(73856093) ^ y.wrapping_mul(19349663)).wrapping_mul(2654435761);
    Rgb([(v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8])
}

fn search_bench(c: &mut Criterion) {

    // Build a shifted stereo pair
    let lhs = RgbImage::from_fn(512, 512, scene);
    let rhs = RgbImage::from_fn(512, 512, |x, y| scene(x + 16, y));

    let params = SearchParams::new(
        Radii::new(15, 15),
        Offset::new(-20, 0),
        Radii::new(24, 4),
        1_000_000
    );
    let depth = DepthParams::new(125.0, 0.05, 100.0);
    let query = Coordinates::new(256, 256);

    // Benchmark sequential and parallel search
    c.bench_function("search 31x31 over 49x9", |b| {
        b.iter(|| search(black_box(&lhs), black_box(&rhs), query, &params))
    });

    let par = params.with_parallel(true);
    c.bench_function("search 31x31 over 49x9 parallel", |b| {
        b.iter(|| search(black_box(&lhs), black_box(&rhs), query, &par))
    });

    c.bench_function("estimate_depth 31x31 over 49x9", |b| {
        b.iter(|| estimate_depth(black_box(&lhs), black_box(&rhs), query, &params, &depth))
    });
}

criterion_group!(benches, search_bench);
criterion_main!(benches);
