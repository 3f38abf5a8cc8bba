//! Benchmarks for opening and rendering notes.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic notes with a configurable amount of ink.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

#[path = "../tests/common/mod.rs"]
mod common;

use common::{png, MediaSpec, NoteBuilder, StrokeSpec, TextSpec};

/// A note whose ink spans `pages` pages, 40 strokes of 50 points per page.
fn create_test_note(pages: usize) -> Vec<u8> {
    let page_height = 600.0 * 1.414;
    let mut builder = NoteBuilder::new()
        .global_text(TextSpec::plain("Benchmark notes\nsecond line"))
        .file("Images/a.png", png(64, 64, [40, 80, 120, 200]))
        .media(MediaSpec::image((50.0, 50.0), (128.0, 96.0), "Images/a.png"));

    for page in 0..pages {
        let top = page as f32 * page_height as f32;
        for stroke in 0..40 {
            let points: Vec<(f32, f32)> = (0..50)
                .map(|i| (10.0 + i as f32 * 10.0, top + 10.0 + stroke as f32 * 20.0))
                .collect();
            builder = builder.stroke(StrokeSpec::new(&points));
        }
    }
    builder.build()
}

/// Benchmark container detection.
fn bench_format_detection(c: &mut Criterion) {
    let note = create_test_note(1);
    let non_note = b"Not a note file at all, just random text content";

    c.bench_function("detect_valid_note", |b| {
        b.iter(|| unnote::detect_format_from_bytes(black_box(&note)).unwrap());
    });

    c.bench_function("detect_non_note", |b| {
        b.iter(|| unnote::detect_format_from_bytes(black_box(non_note)).is_err());
    });
}

/// Benchmark opening notes of various sizes.
fn bench_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("open");

    for page_count in [1, 5, 20].iter() {
        let data = create_test_note(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| unnote::open_bytes(black_box(data.clone())).unwrap());
        });
    }

    group.finish();
}

/// Benchmark page rendering, sequential vs parallel.
fn bench_render(c: &mut Criterion) {
    let data = create_test_note(10);
    let options = unnote::RenderOptions::default();
    let mut group = c.benchmark_group("render");

    let doc = unnote::open_bytes(data.clone()).unwrap();
    group.bench_function("single_page", |b| {
        b.iter(|| doc.render_page(black_box(0), &options).unwrap());
    });
    group.bench_function("all_pages_parallel", |b| {
        b.iter(|| unnote::render_pages(&doc, &options).unwrap());
    });

    let sequential =
        unnote::open_bytes_with_options(data, unnote::ParseOptions::new().sequential()).unwrap();
    group.bench_function("all_pages_sequential", |b| {
        b.iter(|| unnote::render_pages(&sequential, &options).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_format_detection, bench_open, bench_render);
criterion_main!(benches);
