use airnav::WeightedGraph;
use criterion::{
    criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion,
    Throughput,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const SEED: u64 = 0x5AFE_C0DE;

fn random_network(
    rng: &mut StdRng,
    airports: u32,
    links: u32,
) -> WeightedGraph<u32> {
    let mut graph = WeightedGraph::new();
    for airport in 0..airports {
        graph.add_vertex(airport);
    }
    graph.extend((0..links).map(|_| {
        (
            rng.gen_range(0..airports),
            rng.gen_range(0..airports),
            rng.gen_range(1..5_000),
            rng.gen_bool(0.2),
        )
    }));
    graph
}

fn bench_route(c: &mut Criterion) {
    let mut group = c.benchmark_group("route");
    for airports in [100, 1_000, 10_000] {
        let mut rng = StdRng::seed_from_u64(SEED);
        let graph = random_network(&mut rng, airports, airports * 8);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::from_parameter(airports),
            &graph,
            |b, graph| {
                b.iter_batched(
                    || (rng.gen_range(0..airports), rng.gen_range(0..airports)),
                    |(src, dst)| criterion::black_box(graph.route(&src, &dst)),
                    BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_route);
criterion_main!(benches);
