use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use nali::{encoding, AppConfig, Annotator, Extractor, GeoLocator};
use std::hint::black_box;

// Generate apache-style access log lines, one IPv4 address each
fn generate_log_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "{}.{}.{}.{} - - [01/Jan/2024:00:00:{:02} +0000] \"GET /index.html HTTP/1.1\" 200 1234\n",
                (i % 223) + 1,
                (i * 7) % 256,
                (i * 13) % 256,
                (i * 17) % 256,
                i % 60
            )
        })
        .collect()
}

// Lines with no dotted quad at all, the identity path
fn generate_plain_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("worker {i} finished batch 1.2 in {}ms\n", i % 97))
        .collect()
}

fn total_len(lines: &[String]) -> u64 {
    lines.iter().map(|l| l.len() as u64).sum()
}

// Benchmark first-match extraction
fn bench_extract(c: &mut Criterion) {
    let extractor = Extractor::new().expect("Failed to build extractor");
    let with_ips = generate_log_lines(1000);
    let without_ips = generate_plain_lines(1000);

    let mut group = c.benchmark_group("extract");
    group.throughput(Throughput::Bytes(total_len(&with_ips)));

    group.bench_function("log_lines", |b| {
        b.iter(|| {
            with_ips
                .iter()
                .filter(|line| extractor.extract(black_box(line)).is_some())
                .count()
        });
    });

    group.bench_function("no_match", |b| {
        b.iter(|| {
            without_ips
                .iter()
                .filter(|line| extractor.extract(black_box(line)).is_some())
                .count()
        });
    });

    group.finish();
}

// Benchmark full-line annotation without a database, plain and colored
fn bench_annotate(c: &mut Criterion) {
    let lines = generate_log_lines(1000);
    let mut group = c.benchmark_group("annotate");
    group.throughput(Throughput::Bytes(total_len(&lines)));

    for (name, config) in [
        ("plain", AppConfig { color: false }),
        ("color", AppConfig { color: true }),
    ] {
        group.bench_function(name, |b| {
            let mut annotator = Annotator::new(
                Extractor::new().expect("Failed to build extractor"),
                GeoLocator::unavailable(),
            );
            b.iter(|| {
                for line in &lines {
                    black_box(annotator.annotate(black_box(line), &config));
                }
            });
        });
    }

    group.finish();
}

// Benchmark GBK normalization of ASCII-heavy input
fn bench_normalize(c: &mut Criterion) {
    let lines = generate_log_lines(1000);
    let mut group = c.benchmark_group("normalize");
    group.throughput(Throughput::Bytes(total_len(&lines)));

    group.bench_function("gbk_ascii", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(encoding::gbk_to_utf8(black_box(line.as_bytes())));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_extract, bench_annotate, bench_normalize);
criterion_main!(benches);
