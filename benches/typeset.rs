//! Typesetting benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tty_typesetter::{Catalog, Environment, TypesetOptions, Typesetter};

fn bench_wrap_prose(c: &mut Criterion) {
    let catalog = Catalog::builtin();
    let ts = Typesetter::new(&catalog, &Environment::new()).unwrap();
    let options = TypesetOptions::default().with_column_limit(80);
    let mut group = c.benchmark_group("typeset");

    let prose = "The quick brown fox jumps over the lazy dog. ".repeat(500);
    group.throughput(Throughput::Bytes(prose.len() as u64));

    group.bench_function("prose_80", |b| {
        b.iter(|| black_box(ts.typeset(black_box(&prose), &options).count()))
    });

    group.finish();
}

fn bench_wrap_cjk(c: &mut Criterion) {
    let catalog = Catalog::builtin();
    let ts = Typesetter::new(&catalog, &Environment::new()).unwrap();
    let options = TypesetOptions::default().with_column_limit(40);
    let mut group = c.benchmark_group("typeset");

    let cjk = "\u{6F22}\u{5B57}\u{304B}\u{306A}\u{4EA4}\u{3058}\u{308A}\u{6587} ".repeat(500);
    group.throughput(Throughput::Bytes(cjk.len() as u64));

    group.bench_function("cjk_40", |b| {
        b.iter(|| black_box(ts.typeset(black_box(&cjk), &options).count()))
    });

    group.finish();
}

fn bench_wrap_hard(c: &mut Criterion) {
    let catalog = Catalog::builtin();
    let ts = Typesetter::new(&catalog, &Environment::new()).unwrap();
    let options = TypesetOptions {
        nice_wrap: false,
        ..TypesetOptions::default().with_column_limit(20)
    };
    let mut group = c.benchmark_group("typeset");

    let text = "a\tb\u{AD}c \x1b[1mbold\x1b[0m ".repeat(1000);
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("hard_wrap_20", |b| {
        b.iter(|| black_box(ts.typeset(black_box(&text), &options).count()))
    });

    group.finish();
}

criterion_group!(benches, bench_wrap_prose, bench_wrap_cjk, bench_wrap_hard);
criterion_main!(benches);
