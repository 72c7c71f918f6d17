use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};
use win_statistics::{Simulation, SimulationConfig, WinHistogram, fill};

const EVENTS: usize = 50_000;

fn random_wins(count: usize, rng: &mut StdRng) -> Vec<(f64, i64)> {
    (0..count)
        .map(|_| (rng.gen_range(0.0..5.0), rng.gen_range(1..=2)))
        .collect()
}

fn filled(seed: u64) -> WinHistogram {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut hist = WinHistogram::new();
    fill(&mut hist, EVENTS, &mut rng);
    hist
}

fn bench_log(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1234);
    let wins = random_wins(10_000, &mut rng);
    c.bench_function("log_10k_wins", |b| {
        b.iter(|| {
            let mut hist = WinHistogram::new();
            for &(amount, hits) in &wins {
                hist.log(amount, hits);
            }
            black_box(hist.len());
        })
    });
}

fn bench_hit_count(c: &mut Criterion) {
    let hist = filled(2024);
    let queries: Vec<f64> = (0..=50).map(|t| t as f64 / 10.0).collect();
    c.bench_function("hit_count_all_buckets", |b| {
        b.iter(|| {
            let mut total = 0u64;
            for &q in &queries {
                total += hist.hit_count(q);
            }
            black_box(total);
        })
    });
}

fn bench_merge(c: &mut Criterion) {
    let shards: Vec<WinHistogram> = (0..10).map(filled).collect();
    c.bench_function("merge_10_shards", |b| {
        b.iter(|| {
            let mut merged = WinHistogram::new();
            for shard in &shards {
                merged.merge_from(shard);
            }
            black_box(merged.total_hits());
        })
    });
}

fn bench_report(c: &mut Criterion) {
    let hist = filled(7);
    c.bench_function("render_report", |b| b.iter(|| black_box(hist.render_report())));
}

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation");
    group.sample_size(10);
    for parallel in [false, true] {
        let simulation = Simulation::new(
            SimulationConfig::default()
                .with_seed(555)
                .with_parallel_fill(parallel),
        )
        .unwrap();
        let name = if parallel { "parallel_fill" } else { "sequential_fill" };
        group.bench_function(name, |b| {
            b.iter(|| {
                let outcome = simulation.run(Some(WinHistogram::new)).unwrap();
                black_box(outcome.checks_passed);
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_log,
    bench_hit_count,
    bench_merge,
    bench_report,
    bench_simulation
);
criterion_main!(benches);
