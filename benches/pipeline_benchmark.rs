//! Benchmarks for the compression, merge and split pipelines.
//!
//! Run with: cargo bench
//!
//! Inputs are synthetic documents built with lopdf.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::{Dictionary, Object, Stream};
use pdfops::{CompressionLevel, CompressionOptions};

/// Creates a document with `page_count` pages of the given size.
fn create_test_pdf(page_count: usize, width: i64, height: i64) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(page_count);
    for i in 0..page_count {
        let text = format!(
            "BT /F1 12 Tf 100 700 Td (Page {} - Benchmark content for pipeline measurement.) Tj ET",
            i + 1
        );
        let content = doc.add_object(Stream::new(Dictionary::new(), text.repeat(20).into_bytes()));
        let page = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array([0, 0, width, height].map(Object::Integer).to_vec()),
            ),
            ("Contents", Object::Reference(content)),
        ]));
        kids.push(Object::Reference(page));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(page_count as i64)),
            ("Kids", Object::Array(kids)),
        ])),
    );
    let catalog = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog));

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// Benchmark PDF format detection.
fn bench_format_detection(c: &mut Criterion) {
    let pdf_data = create_test_pdf(1, 612, 792);
    let non_pdf_data = b"Not a PDF file at all, just random text content";

    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| pdfops::detect_format_from_bytes(black_box(&pdf_data)).unwrap());
    });

    c.bench_function("detect_non_pdf", |b| {
        b.iter(|| pdfops::detect_format_from_bytes(black_box(non_pdf_data)).is_err());
    });
}

/// Benchmark compression at each level.
fn bench_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    let data = create_test_pdf(10, 2400, 3200);

    for level in CompressionLevel::ALL {
        let options = CompressionOptions::new().with_level(level);
        group.bench_function(level.as_str(), |b| {
            b.iter(|| pdfops::compress(black_box(&data), &options).unwrap());
        });
    }

    group.finish();
}

/// Benchmark merge and split at various sizes.
fn bench_merge_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_split");

    for page_count in [1, 5, 20] {
        let data = create_test_pdf(page_count, 612, 792);
        let sources = vec![data.clone(), data.clone(), data.clone()];

        group.bench_function(format!("merge_3x{}_pages", page_count), |b| {
            b.iter(|| pdfops::merge(black_box(&sources)).unwrap());
        });
        group.bench_function(format!("split_{}_pages", page_count), |b| {
            b.iter(|| pdfops::split(black_box(&data)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the size estimate.
fn bench_estimate(c: &mut Criterion) {
    c.bench_function("estimate_size", |b| {
        b.iter(|| pdfops::estimate_size(black_box(1_000_000), CompressionLevel::Balanced, 80));
    });
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_compression,
    bench_merge_split,
    bench_estimate,
);
criterion_main!(benches);
