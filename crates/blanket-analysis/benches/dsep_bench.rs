//! d-separation benchmarks on random DAGs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use blanket_analysis::graph::{markov_blanket, random_dag, Graph, RandomGraphParams};

fn dag(num_nodes: usize) -> Graph {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    random_dag(&RandomGraphParams::new(num_nodes, 1.0), &mut rng)
}

fn bench_d_separation(c: &mut Criterion) {
    let mut group = c.benchmark_group("d_separation");
    for size in [50, 200, 1000] {
        let g = dag(size);
        let nodes = g.nodes();
        let (x, y) = (&nodes[0], &nodes[size - 1]);
        let z = markov_blanket(&g, x).unwrap_or_default();
        group.bench_with_input(BenchmarkId::new("given_blanket", size), &size, |b, _| {
            b.iter(|| black_box(g.is_d_separated_from(x, y, &z).unwrap_or(false)));
        });
        group.bench_with_input(BenchmarkId::new("marginal", size), &size, |b, _| {
            b.iter(|| black_box(g.is_d_separated_from(x, y, &[]).unwrap_or(false)));
        });
    }
    group.finish();
}

fn bench_sepset(c: &mut Criterion) {
    let g = dag(200);
    let nodes = g.nodes();
    c.bench_function("sepset_200", |b| {
        b.iter(|| {
            for y in nodes.iter().skip(1).take(20) {
                black_box(g.sepset(&nodes[0], y).ok());
            }
        });
    });
}

criterion_group!(benches, bench_d_separation, bench_sepset);
criterion_main!(benches);
