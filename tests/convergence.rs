use rand::{Rng, SeedableRng, rngs::StdRng};
use std::collections::HashMap;
use win_statistics::{
    Simulation, SimulationConfig, SimulationError, WinHistogram, WinStat, run_simulation,
};

fn assert_within(observed: u64, expected: f64, tol: f64, amount: f64) {
    let rel_err = (observed as f64 - expected).abs() / expected;
    assert!(
        rel_err < tol,
        "bucket {amount:.1}: observed {observed}, expected {expected} (rel error {rel_err:.3})"
    );
}

fn seeded(seed: u64) -> Simulation {
    Simulation::new(SimulationConfig::default().with_seed(seed)).unwrap()
}

#[test]
fn merged_histogram_converges() {
    let outcome = seeded(1337).run(Some(WinHistogram::new)).unwrap();
    let merged = &outcome.merged;

    assert_eq!(outcome.seed, 1337);
    assert_eq!(outcome.checks_passed, 34);
    assert_within(merged.hit_count(0.0), 250_000.0, 0.1, 0.0);
    assert_within(merged.hit_count(2.5), 12_500.0, 0.1, 2.5);
    assert_within(merged.hit_count(1.0), 6_250.0, 0.1, 1.0);
    assert_within(merged.hit_count(4.0), 6_250.0, 0.1, 4.0);
    assert_eq!(merged.hit_count(0.9), 0);
    assert_eq!(merged.hit_count(4.1), 0);
}

#[test]
fn parallel_run_passes_and_matches_sequential() {
    let sequential = seeded(99).run(Some(WinHistogram::new)).unwrap();
    let parallel = Simulation::new(
        SimulationConfig::default()
            .with_seed(99)
            .with_parallel_fill(true),
    )
    .unwrap()
    .run(Some(WinHistogram::new))
    .unwrap();
    assert_eq!(sequential.merged, parallel.merged);
}

#[test]
fn merge_matches_single_pass() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut shards = vec![WinHistogram::new(); 5];
    let mut combined = WinHistogram::new();
    let mut exact: HashMap<i64, u64> = HashMap::new();
    let n = shards.len();

    for i in 0..10_000 {
        let tenths = rng.gen_range(0..60);
        let hits = rng.gen_range(1..=3);
        let amount = tenths as f64 / 10.0;
        shards[i % n].log(amount, hits);
        combined.log(amount, hits);
        *exact.entry(tenths).or_insert(0) += hits as u64;
    }

    let mut merged = WinHistogram::new();
    for shard in &shards {
        merged.merge_from(shard);
    }

    assert_eq!(merged, combined);
    for (&tenths, &count) in &exact {
        assert_eq!(merged.hit_count(tenths as f64 / 10.0), count);
    }
}

#[test]
fn report_is_written_with_timing_line() {
    let mut out = Vec::new();
    let elapsed_ms = seeded(5)
        .run_and_report(Some(WinHistogram::new), &mut out)
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("Total win amount: "));
    assert!(text.contains("The smallest non-zero win is 1.0, the biggest is 4.0."));
    assert!(text.contains("1. 0.0: "));
    assert!(text.ends_with(&format!("Simulation took {elapsed_ms}ms.\n")));
}

#[test]
fn missing_factory_fails_fast() {
    let result = run_simulation::<WinHistogram, fn() -> WinHistogram>(None);
    assert!(matches!(result, Err(SimulationError::MissingFactory)));
}

/// Folds over bucket keys but never reads the counts of the other histogram.
#[derive(Default)]
struct KeysOnlyMerge(WinHistogram);

impl WinStat for KeysOnlyMerge {
    fn log(&mut self, win_amount: f64, hit_count: i64) {
        self.0.log(win_amount, hit_count);
    }

    fn hit_count(&self, win_amount: f64) -> u64 {
        self.0.hit_count(win_amount)
    }

    fn merge_from(&mut self, other: &Self) {
        let keys: Vec<_> = other.0.iter().map(|(key, _)| key).collect();
        for key in keys {
            let own = self.0.hit_count(key.amount());
            self.0.log(key.amount(), own as i64);
        }
    }

    fn render_report(&self) -> String {
        self.0.render_report()
    }
}

#[test]
fn battery_catches_merge_that_ignores_counts() {
    let result = seeded(3).run(Some(KeysOnlyMerge::default));
    match result {
        Err(SimulationError::Assertion {
            win_amount,
            observed,
            expected,
            ..
        }) => {
            assert_eq!(win_amount, 0.0);
            assert_eq!(observed, 0);
            assert_eq!(expected, 250_000.0);
        }
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("broken merge passed verification"),
    }
}

#[test]
fn assertion_message_names_the_bucket() {
    let err = SimulationError::Assertion {
        win_amount: 4.1,
        observed: 3,
        expected: 0.0,
        tolerance_pct: 10.0,
    };
    assert_eq!(
        err.to_string(),
        "statistics contain incorrect data: there are 3 hits of \"4.1\" but expected 0 +/-10% hits"
    );
}
