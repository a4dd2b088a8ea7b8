// Loader performance benchmarks for Merriment
//
// These benchmarks measure codebox parsing on single large boxes and on
// programs spread over many imported units.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use merry_syntax::{Loader, LoaderConfig, MemorySource};

/// Draws one codebox of `width` x `height` filled with no-ops.
fn codebox(name: &str, width: usize, height: usize) -> String {
    let border = "#".repeat(width + 2);
    let mut text = format!("{border}\n#{name:^width$}#\n#v{}#\n", "=".repeat(width - 1));
    for _ in 0..height {
        text.push('#');
        text.push_str(&" ".repeat(width));
        text.push_str("#\n");
    }
    text.push_str(&border);
    text.push('\n');
    text
}

/// Loads a single square codebox of growing size.
fn bench_single_codebox(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_codebox");

    for size in [8usize, 64, 256] {
        let source = MemorySource::new().with_unit("main", codebox("", size, size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, source| {
            b.iter(|| {
                Loader::new(black_box(source), LoaderConfig::default())
                    .load("main")
                    .unwrap()
            })
        });
    }

    group.finish();
}

/// Loads a main unit importing one library unit per command letter.
fn bench_many_imports(c: &mut Criterion) {
    let mut source = MemorySource::new();
    let mut main = String::new();
    for letter in 'a'..='z' {
        let unit = format!("lib_{letter}");
        main.push_str(&format!("{{{unit}}}\n"));
        source.insert(unit, codebox(&letter.to_string(), 16, 16));
    }
    main.push_str(&codebox("", 16, 16));
    source.insert("main", main);

    c.bench_function("many_imports", |b| {
        b.iter(|| {
            Loader::new(black_box(&source), LoaderConfig::default())
                .load("main")
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_single_codebox, bench_many_imports);
criterion_main!(benches);
