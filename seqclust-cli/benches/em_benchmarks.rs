use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use seqclust_core::config::EmConfig;
use seqclust_core::engine::{ClusteringEngine, EmSequenceEngine};
use seqclust_core::sequence::SequenceMatrix;

/// Deterministic synthetic sequences over ACGT, no RNG dependency.
fn synthetic_sequences(n_seq: usize, seq_len: usize) -> SequenceMatrix {
    const BASES: [u8; 4] = *b"ACGT";
    let mut state: u64 = 0x5ec1_c1a5;
    let rows: Vec<Vec<u8>> = (0..n_seq)
        .map(|_| {
            (0..seq_len)
                .map(|_| {
                    state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                    BASES[(state >> 33) as usize % 4]
                })
                .collect()
        })
        .collect();
    SequenceMatrix::from_rows(&rows).unwrap()
}

fn bench_em_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("em_step");

    for &(n_seq, seq_len, n_classes, motif_width) in
        &[(50, 30, 3, 8), (100, 50, 4, 12), (200, 50, 4, 12)]
    {
        let cells = n_seq * n_classes * (seq_len - motif_width + 1);
        group.throughput(Throughput::Elements(cells as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!(
                "{}seq_{}bp_k{}_w{}",
                n_seq, seq_len, n_classes, motif_width
            )),
            &(n_seq, seq_len, n_classes, motif_width),
            |b, &(n_seq, seq_len, n_classes, motif_width)| {
                let sequences = synthetic_sequences(n_seq, seq_len);
                let config = EmConfig {
                    n_classes,
                    motif_width,
                    seed: Some("bench".to_string()),
                    ..Default::default()
                };
                let mut engine = EmSequenceEngine::new(sequences, &config).unwrap();
                b.iter(|| engine.step());
            },
        );
    }

    group.finish();
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("seeding");

    let sequences = synthetic_sequences(100, 50);
    let config = EmConfig {
        n_classes: 4,
        motif_width: 12,
        seed: Some("bench".to_string()),
        ..Default::default()
    };
    group.bench_function("random_seed_100seq", |b| {
        b.iter(|| EmSequenceEngine::new(sequences.clone(), &config).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_em_step, bench_construction);
criterion_main!(benches);
