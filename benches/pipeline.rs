//! Benchmarks for expression evaluation and accent derivation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use matucalc::accent::{score, Celebi, Quantizer, ScoreOptions, Wu};
use matucalc::calc::{evaluate, DisplayBuffer, Key};
use matucalc::types::Colour;
use matucalc::BracketMode;

/// A smooth two-axis gradient with a dominant band, `size` x `size` pixels.
fn wallpaper(size: u32) -> Vec<Colour> {
    let mut pixels = Vec::with_capacity((size * size) as usize);
    for y in 0..size {
        for x in 0..size {
            if y < size / 3 {
                pixels.push(Colour::rgb(40, 90, 160));
            } else {
                let r = (x * 255 / size) as u8;
                let g = (y * 255 / size) as u8;
                pixels.push(Colour::rgb(r, g, 255 - r / 2));
            }
        }
    }
    pixels
}

// -- Evaluation benchmarks --

fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation");

    group.bench_function("evaluate_simple", |b| {
        b.iter(|| evaluate(black_box("2+2")).unwrap())
    });

    group.bench_function("evaluate_rewrites", |b| {
        b.iter(|| evaluate(black_box("√16×(3!+2)^2÷π-10%3")).unwrap())
    });

    group.bench_function("press_sequence", |b| {
        let keys: Vec<Key> = "12×3+4-5÷2"
            .chars()
            .map(|c| c.to_string().parse::<Key>().unwrap())
            .chain(std::iter::once(Key::Equals))
            .collect();
        b.iter(|| {
            let mut display = DisplayBuffer::new(BracketMode::Depth);
            display.press_all(black_box(keys.iter().copied()))
        })
    });

    group.finish();
}

// -- Quantization benchmarks --

fn bench_quantization(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantization");
    group.sample_size(20);

    let small = wallpaper(64);
    let large = wallpaper(256);

    group.bench_function("wu_64", |b| {
        b.iter(|| Wu.quantize(black_box(&small), 512))
    });

    group.bench_function("celebi_64", |b| {
        b.iter(|| Celebi.quantize(black_box(&small), 512))
    });

    group.bench_function("celebi_256", |b| {
        b.iter(|| Celebi.quantize(black_box(&large), 512))
    });

    let palette = Celebi.quantize(&large, 512);
    group.bench_function("score_256", |b| {
        b.iter(|| score(black_box(&palette), &ScoreOptions::default()))
    });

    group.finish();
}

criterion_group!(benches, bench_evaluation, bench_quantization);
criterion_main!(benches);
