//! Benchmarks for grana-core render operations
//!
//! Run with: cargo bench -p grana-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grana_core::decoders::DecodedImage;
use grana_core::models::{EditParams, ParamField};
use grana_core::noise::NoiseField;
use grana_core::pipeline::{render, RenderContext};

/// Generate synthetic test image data
fn generate_test_image(width: u32, height: u32) -> DecodedImage {
    let pixel_count = (width * height) as usize;
    let mut data = Vec::with_capacity(pixel_count * 3);

    for i in 0..pixel_count {
        let x = (i % width as usize) as f32 / width as f32;
        let y = (i / width as usize) as f32 / height as f32;

        data.push(0.1 + 0.8 * x);
        data.push(0.1 + 0.8 * y);
        data.push(0.1 + 0.8 * (x + y) / 2.0);
    }

    DecodedImage::from_rgb(width, height, data).unwrap()
}

fn busy_params() -> EditParams {
    let mut params = EditParams::default();
    params.set_field(ParamField::GrainAlpha, 0.6);
    params.set_field(ParamField::GrainScale, 2.0);
    params.set_field(ParamField::Contrast, 1.1);
    params.set_field(ParamField::Temperature, 5200.0);
    params.is_on_bright_color = true;
    params.is_on_dark_color = true;
    params
}

/// Benchmark the full six-stage pipeline
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let ctx = RenderContext::default();
    let params = busy_params();

    for size in [256, 512, 1024, 2048].iter() {
        let width = *size;
        let height = *size;
        let pixel_count = (width as u64) * (height as u64);

        group.throughput(Throughput::Elements(pixel_count));

        let base = generate_test_image(width, height);
        let noise = NoiseField::generate(width, height, 42);

        group.bench_with_input(
            BenchmarkId::new("full_pipeline", format!("{}x{}", width, height)),
            &(width, height),
            |b, _| {
                b.iter(|| {
                    render(
                        black_box(&ctx),
                        black_box(&base),
                        black_box(&noise),
                        black_box(&params),
                    )
                });
            },
        );
    }

    group.finish();
}

/// Benchmark noise field generation
fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("noise");

    for size in [512, 1024, 2048].iter() {
        let width = *size;
        let height = *size;

        group.throughput(Throughput::Elements((width as u64) * (height as u64)));

        group.bench_with_input(
            BenchmarkId::new("generate", format!("{}x{}", width, height)),
            &(width, height),
            |b, &(w, h)| {
                b.iter(|| NoiseField::generate(black_box(w), black_box(h), black_box(42)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_render, bench_noise);
criterion_main!(benches);
