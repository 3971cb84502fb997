//! Benchmarks for the Diptych compositing pipeline.
//!
//! Run with: cargo bench -p diptych-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use diptych_core::pipeline::compose::compose;
use diptych_core::pipeline::encode::{encode_jpeg, DEFAULT_QUALITY};
use diptych_core::pipeline::normalize::normalize;
use diptych_core::pipeline::overlay::render_overlays;
use diptych_core::pipeline::FontChain;
use diptych_core::{SourceImage, TargetDimensions};
use image::{Rgb, RgbImage};

const UNIT: TargetDimensions = TargetDimensions {
    width: 1200,
    height: 900,
};

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

fn benchmark_normalize(c: &mut Criterion) {
    let before = SourceImage::from_pixels(gradient(800, 600));

    c.bench_function("normalize_800x600_to_1200x900", |b| {
        b.iter(|| normalize(black_box(&before), UNIT))
    });
}

fn benchmark_compose(c: &mut Criterion) {
    let before = gradient(UNIT.width, UNIT.height);
    let after = gradient(UNIT.width, UNIT.height);

    c.bench_function("compose_side_by_side", |b| {
        b.iter(|| compose(black_box(&before), black_box(&after)))
    });
}

fn benchmark_overlay(c: &mut Criterion) {
    let canvas = gradient(UNIT.width * 2, UNIT.height);
    let fonts = FontChain::builtin_only().resolve_for_canvas(UNIT.height);

    c.bench_function("render_overlays_builtin", |b| {
        b.iter(|| {
            let mut canvas = canvas.clone();
            render_overlays(&mut canvas, UNIT.width, black_box("pikadesign.me"), &fonts)
        })
    });
}

fn benchmark_encode(c: &mut Criterion) {
    let canvas = gradient(UNIT.width * 2, UNIT.height);

    c.bench_function("encode_jpeg_q95", |b| {
        b.iter(|| encode_jpeg(black_box(&canvas), DEFAULT_QUALITY))
    });
}

criterion_group!(
    benches,
    benchmark_normalize,
    benchmark_compose,
    benchmark_overlay,
    benchmark_encode,
);
criterion_main!(benches);
