//! Benchmarks for log parsing and plot preparation
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use driver_studio::config::{FormatKind, FormatLibrary};
use driver_studio::plot::{decimate_points, split_at_gaps, MAX_RENDER_POINTS};
use driver_studio::schema::{signature, validate_shape};
use driver_studio::{CsvLog, SeriesPartition};

/// CSV text with `columns` series and `rows` samples, every 50th cell empty
fn synthetic_log(columns: usize, rows: usize) -> String {
    let header: Vec<String> = (0..columns).map(|c| format!("ch{}", c)).collect();
    let mut text = header.join(",");
    text.push('\n');
    for r in 0..rows {
        let row: Vec<String> = (0..columns)
            .map(|c| {
                if (r + c) % 50 == 0 {
                    String::new()
                } else {
                    format!("{:.3}", (r as f64 * 0.01 + c as f64).sin())
                }
            })
            .collect();
        text.push_str(&row.join(","));
        text.push('\n');
    }
    text
}

fn bench_csv_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_parse");

    for rows in [1_000, 10_000, 100_000].iter() {
        let text = synthetic_log(8, *rows);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", rows), &text, |b, text| {
            b.iter(|| CsvLog::parse(black_box(text)));
        });
    }

    group.finish();
}

fn bench_plot_preparation(c: &mut Criterion) {
    let mut group = c.benchmark_group("plot_preparation");

    for rows in [10_000, 100_000].iter() {
        let log = CsvLog::parse(&synthetic_log(1, *rows)).unwrap();
        let points = log.points(0);

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("gaps_and_decimate", rows), &points, |b, points| {
            b.iter(|| {
                split_at_gaps(black_box(points))
                    .iter()
                    .map(|run| decimate_points(run, MAX_RENDER_POINTS))
                    .count()
            });
        });
    }

    group.finish();
}

fn bench_partition_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition");

    for len in [16, 128, 1024].iter() {
        let mask: Vec<bool> = (0..*len).map(|i| i % 3 != 0).collect();
        group.bench_with_input(BenchmarkId::new("split", len), &mask, |b, mask| {
            b.iter(|| {
                let mut partition = SeriesPartition::new(mask.len());
                partition.split(0, black_box(mask));
                partition
            });
        });
    }

    group.finish();
}

fn bench_shape_check(c: &mut Criterion) {
    let library = FormatLibrary::default();
    let reference = library.reference(FormatKind::Configuration);
    let candidate = library.template(FormatKind::Configuration);

    c.bench_function("signature", |b| {
        b.iter(|| signature(black_box(reference)));
    });
    c.bench_function("validate_shape", |b| {
        b.iter(|| validate_shape(black_box(&candidate), black_box(reference)));
    });
}

criterion_group!(
    benches,
    bench_csv_parse,
    bench_plot_preparation,
    bench_partition_split,
    bench_shape_check
);
criterion_main!(benches);
