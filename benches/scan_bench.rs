use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use readsift::{Automaton, FilterConfig, PatternTable, ReadClassifier, Scanner};
use std::hint::black_box;

const ADAPTERS: &[&str] = &[
    "AGATCGGAAGAGCACACGTCTGAACTCCAGTCA",
    "AGATCGGAAGAGCGTCGTGTAGGGAAAGAGTGT",
    "CTGTCTCTTATACACATCTCCGAGCCCACGAGAC",
    "CTGTCTCTTATACACATCTGACGCTGCCGACGA",
];

/// Deterministic random reads, adapter-free with high probability
fn generate_reads(count: usize, len: usize) -> Vec<Vec<u8>> {
    const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| (0..len).map(|_| BASES[rng.random_range(0..4)]).collect())
        .collect()
}

fn bench_scan(c: &mut Criterion) {
    let table = PatternTable::from_adapters(ADAPTERS, 13).unwrap();
    let reads = generate_reads(1000, 150);
    let total_bytes: usize = reads.iter().map(|r| r.len()).sum();

    let mut group = c.benchmark_group("scan");
    group.throughput(Throughput::Bytes(total_bytes as u64));

    for errors in [0u8, 1, 2] {
        let automaton = Automaton::build(&table, errors).unwrap();
        let mut scanner = Scanner::new(&automaton);

        group.bench_with_input(BenchmarkId::new("errors", errors), &errors, |b, _| {
            b.iter(|| {
                for read in &reads {
                    black_box(scanner.search_inexact(black_box(read)));
                }
            });
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let table = PatternTable::from_adapters(ADAPTERS, 13).unwrap();
    let config = FilterConfig {
        errors: 1,
        min_length: 50,
        dust_cutoff: 20,
        poly_len: 13,
        mean_quality: 53,
        ..FilterConfig::default()
    };
    let classifier = ReadClassifier::new(&table, config).unwrap();
    let mut scanner = classifier.scanner();

    let reads = generate_reads(1000, 150);
    let qual = vec![b'I'; 150];
    let total_bytes: usize = reads.iter().map(|r| r.len()).sum();

    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Bytes(total_bytes as u64));
    group.bench_function("full_chain", |b| {
        b.iter(|| {
            for read in &reads {
                black_box(classifier.classify(&mut scanner, black_box(read), &qual));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_scan, bench_classify);
criterion_main!(benches);
