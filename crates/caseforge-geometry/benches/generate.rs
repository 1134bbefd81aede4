//! Case generation benchmarks.

use caseforge_core::{catalog, CaseParams, CutoutMode};
use caseforge_geometry::{generate_case_solid_with, DecorativeShape};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn generate_overlay(c: &mut Criterion) {
    let spec = catalog().get("iphone-16-pro").expect("builtin model");
    let params = CaseParams::default().with_cutout_mode(CutoutMode::Overlay);
    c.bench_function("generate_overlay", |b| {
        b.iter(|| generate_case_solid_with(black_box(spec), black_box(&params)))
    });
}

fn generate_subtract(c: &mut Criterion) {
    let spec = catalog().get("iphone-16-pro").expect("builtin model");
    let params = CaseParams::default();
    let mut group = c.benchmark_group("subtract");
    group.sample_size(10);
    group.bench_function("generate_subtract", |b| {
        b.iter(|| generate_case_solid_with(black_box(spec), black_box(&params)))
    });
    group.finish();
}

fn build_parts(c: &mut Criterion) {
    c.bench_function("build_parts", |b| {
        b.iter(|| {
            for shape in DecorativeShape::ALL {
                let _ = black_box(shape).build();
            }
        })
    });
}

criterion_group!(benches, generate_overlay, generate_subtract, build_parts);
criterion_main!(benches);
