//! Performance benchmarks for Chromeval
//!
//! Run with: cargo bench
//!
//! **Validates: Requirements 12.1, 12.3**

use chromeval::core::{
    bp_jaccard, merge_runs, normalize_chrom, overlap_sets, Expanded1, Expanded2, Expansion, Locus,
    LoopCall, MetricsSummary,
};
use chromeval::formats::{BedRecordView, BedpeRecordView};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Deterministic synthetic loci spread over four chromosomes
fn synthetic_loci(n: usize, offset: i64) -> Vec<Locus<u32>> {
    (0..n)
        .map(|i| {
            let chrom = (i % 4 + 18) as u32;
            let start = (i as i64 * 7919 + offset) % 1_000_000;
            Locus::new(chrom, start, start + 5_000 + (i as i64 % 3_000))
        })
        .collect()
}

/// Deterministic synthetic loop calls
fn synthetic_loops(n: usize, offset: i64) -> Vec<LoopCall<u32>> {
    (0..n)
        .map(|i| {
            let chrom = (i % 4 + 18) as u32;
            let x = (i as i64 * 104_729 + offset) % 10_000_000;
            let y = x + 200_000 + (i as i64 % 50) * 10_000;
            LoopCall::new(chrom, x, x + 10_000, y, y + 10_000)
        })
        .collect()
}

fn expand_loci(loci: &[Locus<u32>], tolerance: i64) -> Vec<Expanded1<u32>> {
    loci.iter()
        .map(|l| l.expand(tolerance, Expansion::Pad))
        .collect()
}

fn expand_loops(calls: &[LoopCall<u32>], tolerance: i64) -> Vec<Expanded2<u32>> {
    calls
        .iter()
        .map(|c| c.expand(tolerance, Expansion::Pad))
        .collect()
}

/// Benchmark 1D overlap matching
fn bench_overlap_1d(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlap_1d");

    for size in [100, 500, 1000].iter() {
        let a = expand_loci(&synthetic_loci(*size, 0), 5000);
        let b = expand_loci(&synthetic_loci(*size, 2500), 5000);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &(a, b), |bench, (a, b)| {
            bench.iter(|| black_box(overlap_sets(black_box(a), black_box(b))))
        });
    }

    group.finish();
}

/// Benchmark 2D loop matching
fn bench_overlap_2d(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlap_2d");

    for size in [100, 500].iter() {
        let a = expand_loops(&synthetic_loops(*size, 0), 5000);
        let b = expand_loops(&synthetic_loops(*size, 5000), 5000);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &(a, b), |bench, (a, b)| {
            bench.iter(|| black_box(overlap_sets(black_box(a), black_box(b))))
        });
    }

    group.finish();
}

/// Benchmark interval merging
fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_runs");

    for size in [1_000, 10_000].iter() {
        let loci = synthetic_loci(*size, 0);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &loci, |bench, loci| {
            bench.iter(|| black_box(merge_runs(black_box(loci.clone()))))
        });
    }

    group.finish();
}

/// Benchmark the base-pair Jaccard sweep
fn bench_bp_jaccard(c: &mut Criterion) {
    let a = synthetic_loci(1_000, 0);
    let b = synthetic_loci(1_000, 2500);

    c.bench_function("bp_jaccard_1000", |bench| {
        bench.iter(|| black_box(bp_jaccard(black_box(&a), black_box(&b))))
    });
}

/// Benchmark metric derivation from precomputed overlap sets
fn bench_metrics_summary(c: &mut Criterion) {
    let a = expand_loci(&synthetic_loci(1_000, 0), 5000);
    let b = expand_loci(&synthetic_loci(1_000, 2500), 5000);
    let forward = overlap_sets(&a, &b);
    let backward = overlap_sets(&b, &a);

    c.bench_function("metrics_summary", |bench| {
        bench.iter(|| {
            black_box(MetricsSummary::from_overlap_sets(
                black_box(&forward),
                black_box(&backward),
            ))
        })
    });
}

/// Benchmark BEDPE line parsing
fn bench_bedpe_parsing(c: &mut Criterion) {
    let line = b"chr18\t100000\t110000\tchr18\t300000\t310000\t0,0,255\t25\t5\t1.0e-10";

    c.bench_function("bedpe_parsing", |bench| {
        bench.iter(|| {
            let result = BedpeRecordView::parse(black_box(line.as_slice()));
            black_box(result)
        })
    });
}

/// Benchmark BED line parsing
fn bench_bed_parsing(c: &mut Criterion) {
    let line = b"chr18\t100000\t110000";

    c.bench_function("bed_parsing", |bench| {
        bench.iter(|| {
            let result = BedRecordView::parse(black_box(line.as_slice()));
            black_box(result)
        })
    });
}

/// Benchmark chromosome name normalization
fn bench_chrom_normalization(c: &mut Criterion) {
    let chroms = ["chr1", "1", "CHR18", "Chr22", "chrX", "X", "chrM", "MT"];

    c.bench_function("chrom_normalize", |bench| {
        bench.iter(|| {
            for chrom in &chroms {
                let result = normalize_chrom(black_box(chrom));
                black_box(result);
            }
        })
    });
}

criterion_group!(
    benches,
    bench_overlap_1d,
    bench_overlap_2d,
    bench_merge,
    bench_bp_jaccard,
    bench_metrics_summary,
    bench_bedpe_parsing,
    bench_bed_parsing,
    bench_chrom_normalization,
);

criterion_main!(benches);
