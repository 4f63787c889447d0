//! Benchmarks for attribute settings encoding.
//!
//! Measures the binary and text codecs on a typical record:
//! - Binary write / read (current layout)
//! - Stream size calculation
//! - Text encode / decode

extern crate attrsettings;

use attrsettings::{
    AttributeFactory, AttributeFloat, AttributeSettings, Endian, MemoryStream, StringIdPool,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::{hint::black_box, sync::Arc};

fn sample(pool: &Arc<StringIdPool>) -> AttributeSettings {
    let mut settings = AttributeSettings::with_internal_name(Arc::clone(pool), "blendWeight");
    settings.set_name("Blend Weight");
    settings.set_description("Weight of the second input pose");
    settings.set_interface_type(1);
    for choice in ["linear", "ease in", "ease out", "smooth step"] {
        settings.add_combo_value(choice);
    }
    settings.set_default_value(Some(Box::new(AttributeFloat::new(0.5))));
    settings.set_min_value(Some(Box::new(AttributeFloat::new(0.0))));
    settings.set_max_value(Some(Box::new(AttributeFloat::new(1.0))));
    settings
}

/// Benchmark writing the binary layout into a preallocated stream.
fn bench_binary_write(c: &mut Criterion) {
    let pool = Arc::new(StringIdPool::new());
    let settings = sample(&pool);
    let size = settings.calc_stream_size();

    c.bench_function("settings_binary_write", |b| {
        b.iter(|| {
            let mut stream = MemoryStream::with_capacity(size);
            settings.write(&mut stream, Endian::Little).unwrap();
            black_box(stream)
        });
    });
}

/// Benchmark decoding the binary layout.
fn bench_binary_read(c: &mut Criterion) {
    let pool = Arc::new(StringIdPool::new());
    let factory = AttributeFactory::with_builtin();
    let mut stream = MemoryStream::new();
    sample(&pool).write(&mut stream, Endian::Little).unwrap();
    let bytes = stream.into_inner();

    c.bench_function("settings_binary_read", |b| {
        b.iter(|| {
            let mut stream = MemoryStream::from_bytes(black_box(bytes.clone()));
            let mut settings = AttributeSettings::new(Arc::clone(&pool));
            settings
                .read(&mut stream, Endian::Little, &factory)
                .unwrap();
            black_box(settings)
        });
    });
}

/// Benchmark the stream size calculation.
fn bench_stream_size(c: &mut Criterion) {
    let pool = Arc::new(StringIdPool::new());
    let settings = sample(&pool);

    c.bench_function("settings_stream_size", |b| {
        b.iter(|| black_box(&settings).calc_stream_size());
    });
}

/// Benchmark text encoding.
fn bench_text_encode(c: &mut Criterion) {
    let pool = Arc::new(StringIdPool::new());
    let settings = sample(&pool);

    c.bench_function("settings_text_encode", |b| {
        b.iter(|| black_box(&settings).convert_to_string().unwrap());
    });
}

/// Benchmark text decoding.
fn bench_text_decode(c: &mut Criterion) {
    let pool = Arc::new(StringIdPool::new());
    let factory = AttributeFactory::with_builtin();
    let text = sample(&pool).convert_to_string().unwrap();

    c.bench_function("settings_text_decode", |b| {
        b.iter(|| {
            let mut settings = AttributeSettings::new(Arc::clone(&pool));
            settings
                .init_from_string(black_box(&text), &factory)
                .unwrap();
            black_box(settings)
        });
    });
}

criterion_group!(
    benches,
    bench_binary_write,
    bench_binary_read,
    bench_stream_size,
    bench_text_encode,
    bench_text_decode,
);
criterion_main!(benches);
