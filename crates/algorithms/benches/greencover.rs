//! Classifier benchmark on synthetic imagery

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use verdis_algorithms::greencover::{green_cover, mean_green, GreenCoverParams};
use verdis_core::{Raster, Rgba, RgbaRaster};

fn synthetic_scene(rows: usize, cols: usize) -> RgbaRaster {
    let data: Vec<Rgba> = (0..rows * cols)
        .map(|i| {
            let g = ((i * 37) % 256) as u8;
            Rgba::opaque((i % 64) as u8, g, (i % 32) as u8)
        })
        .collect();
    Raster::from_vec(data, rows, cols).unwrap()
}

fn bench_greencover(c: &mut Criterion) {
    let image = synthetic_scene(512, 512);

    c.bench_function("mean_green_512", |b| {
        b.iter(|| mean_green(black_box(&image)).unwrap())
    });

    c.bench_function("green_cover_512", |b| {
        b.iter(|| green_cover(black_box(&image), GreenCoverParams::default()).unwrap())
    });
}

criterion_group!(benches, bench_greencover);
criterion_main!(benches);
