//! Monte-Carlo fill, merge and verification of win histograms.
//!
//! A run builds `shard_count` histograms through a caller-supplied factory,
//! fills each one with `events_per_shard` synthetic events, folds them in
//! creation order into a fresh histogram and checks the merged hit counts
//! against the frequencies the generating distribution predicts.
//!
//! The generating distribution is fixed: half of all events are zero wins,
//! the rest are uniform on `[1, 4)` (landing on the buckets `1.0..=4.0`) with
//! a hit multiplicity of 1 or 2. The expected-value formulas in
//! [`expectations`] are only valid for exactly this distribution.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::SimulationError;
use crate::histogram::WinKey;
use crate::stat::WinStat;
use crate::util::{duration_ms, shard_seed, within_tolerance};

pub const DEFAULT_SHARD_COUNT: usize = 10;
pub const DEFAULT_EVENTS_PER_SHARD: usize = 50_000;
pub const DEFAULT_TOLERANCE: f64 = 0.1;

const NO_WIN_PROBABILITY: f64 = 0.5;
/// Smallest and largest bucket a win can land in, in tenths.
const WIN_LOW_TENTHS: u64 = 10;
const WIN_HIGH_TENTHS: u64 = 40;
/// The 30 interior buckets are checked as if the win mass were spread over 10
/// equally weighted points, with the two edge buckets at half density.
const MIDDLE_SPLIT: f64 = 10.0;

/// Parameters of a simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Number of independently filled histograms.
    pub shard_count: usize,
    /// Events logged into each shard.
    pub events_per_shard: usize,
    /// Relative tolerance of every check, in `(0, 1)`.
    pub tolerance: f64,
    /// Base seed. `None` draws a fresh one per run; it is logged either way.
    pub seed: Option<u64>,
    /// Fill shards on the rayon pool instead of sequentially.
    pub parallel_fill: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
            events_per_shard: DEFAULT_EVENTS_PER_SHARD,
            tolerance: DEFAULT_TOLERANCE,
            seed: None,
            parallel_fill: false,
        }
    }
}

impl SimulationConfig {
    pub fn with_shard_count(mut self, shard_count: usize) -> Self {
        self.shard_count = shard_count;
        self
    }

    pub fn with_events_per_shard(mut self, events_per_shard: usize) -> Self {
        self.events_per_shard = events_per_shard;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel_fill(mut self, parallel_fill: bool) -> Self {
        self.parallel_fill = parallel_fill;
        self
    }

    /// Rejects configurations the verification battery cannot work with.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.shard_count == 0 {
            return Err(SimulationError::InvalidConfig(
                "shard_count must be at least 1".to_string(),
            ));
        }
        if self.events_per_shard == 0 {
            return Err(SimulationError::InvalidConfig(
                "events_per_shard must be at least 1".to_string(),
            ));
        }
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(SimulationError::InvalidConfig(format!(
                "tolerance must be in (0, 1), got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// A single check of the verification battery.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Expectation {
    pub win: WinKey,
    pub expected_hits: f64,
}

/// The checks run against a merged histogram, in execution order: the zero
/// bucket, the interior buckets `1.1..=3.9`, the edges `1.0` and `4.0`, then
/// the out-of-range buckets `0.9` and `4.1`, which must be exactly empty.
pub fn expectations(config: &SimulationConfig) -> Vec<Expectation> {
    let expected_zero = (config.events_per_shard as f64 / 2.0) * config.shard_count as f64;
    let expected_middle = expected_zero / 2.0 / MIDDLE_SPLIT;
    let expected_edge = expected_middle / 2.0;

    let check = |tenths: u64, expected_hits: f64| Expectation {
        win: WinKey::from_tenths(tenths),
        expected_hits,
    };

    let mut checks = vec![check(0, expected_zero)];
    checks.extend(((WIN_LOW_TENTHS + 1)..WIN_HIGH_TENTHS).map(|t| check(t, expected_middle)));
    checks.push(check(WIN_LOW_TENTHS, expected_edge));
    checks.push(check(WIN_HIGH_TENTHS, expected_edge));
    checks.push(check(WIN_LOW_TENTHS - 1, 0.0));
    checks.push(check(WIN_HIGH_TENTHS + 1, 0.0));
    checks
}

/// Runs the verification battery against `stat`.
///
/// Returns the number of checks passed, or the first failing check as
/// [`SimulationError::Assertion`].
pub fn verify<S: WinStat>(stat: &S, config: &SimulationConfig) -> Result<usize, SimulationError> {
    let checks = expectations(config);
    for check in &checks {
        let win_amount = check.win.amount();
        let observed = stat.hit_count(win_amount);
        if !within_tolerance(observed, check.expected_hits, config.tolerance) {
            warn!(
                win = %check.win,
                observed,
                expected = check.expected_hits,
                "hit count outside tolerance"
            );
            return Err(SimulationError::Assertion {
                win_amount,
                observed,
                expected: check.expected_hits,
                tolerance_pct: config.tolerance * 100.0,
            });
        }
    }
    Ok(checks.len())
}

/// Logs `events` synthetic events into `stat`.
pub fn fill<S: WinStat, R: Rng>(stat: &mut S, events: usize, rng: &mut R) {
    for _ in 0..events {
        if rng.gen::<f64>() < NO_WIN_PROBABILITY {
            stat.log(0.0, 1);
            continue;
        }
        // [1, 4) before quantization, buckets 1.0..=4.0 after.
        let win_amount = rng.gen::<f64>() + (rng.gen::<f64>() * 3.0).floor() + 1.0;
        let hit_count = (rng.gen::<f64>() * 2.0).floor() as i64 + 1;
        stat.log(win_amount, hit_count);
    }
}

/// Result of a verified run.
#[derive(Clone, Debug)]
pub struct SimulationOutcome<S> {
    /// The merged histogram the checks ran against.
    pub merged: S,
    /// Wall-clock time from shard creation through verification.
    pub elapsed: Duration,
    /// Base seed the shard seeds were derived from.
    pub seed: u64,
    pub checks_passed: usize,
}

impl<S> SimulationOutcome<S> {
    pub fn elapsed_ms(&self) -> u64 {
        duration_ms(self.elapsed)
    }
}

/// Monte-Carlo driver.
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimulationConfig,
}

impl Simulation {
    /// Creates a driver after validating `config`.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Fills, merges and verifies histograms produced by `factory`.
    pub fn run<S, F>(&self, factory: Option<F>) -> Result<SimulationOutcome<S>, SimulationError>
    where
        S: WinStat + Send,
        F: Fn() -> S,
    {
        let factory = factory.ok_or(SimulationError::MissingFactory)?;
        let seed = self.config.seed.unwrap_or_else(rand::random);
        info!(
            seed,
            shards = self.config.shard_count,
            events_per_shard = self.config.events_per_shard,
            parallel = self.config.parallel_fill,
            "starting win simulation"
        );

        let started = Instant::now();
        let merged = self.fill_and_merge(&factory, seed);
        let checks_passed = verify(&merged, &self.config)?;
        let elapsed = started.elapsed();

        info!(
            elapsed_ms = duration_ms(elapsed),
            checks_passed, "win simulation verified"
        );
        Ok(SimulationOutcome {
            merged,
            elapsed,
            seed,
            checks_passed,
        })
    }

    /// Runs the simulation, then writes the merged report and a timing line
    /// to `out`. Returns the elapsed milliseconds.
    pub fn run_and_report<S, F, W>(
        &self,
        factory: Option<F>,
        out: &mut W,
    ) -> Result<u64, SimulationError>
    where
        S: WinStat + Send,
        F: Fn() -> S,
        W: Write,
    {
        let outcome = self.run(factory)?;
        let elapsed_ms = outcome.elapsed_ms();
        write!(out, "{}", outcome.merged.render_report())?;
        writeln!(out, "Simulation took {elapsed_ms}ms.")?;
        out.flush()?;
        Ok(elapsed_ms)
    }

    pub(crate) fn fill_and_merge<S, F>(&self, factory: &F, seed: u64) -> S
    where
        S: WinStat + Send,
        F: Fn() -> S,
    {
        let mut shards: Vec<S> = (0..self.config.shard_count).map(|_| factory()).collect();
        let events = self.config.events_per_shard;
        if self.config.parallel_fill {
            shards
                .par_iter_mut()
                .enumerate()
                .for_each(|(idx, shard)| fill_shard(shard, events, seed, idx));
        } else {
            for (idx, shard) in shards.iter_mut().enumerate() {
                fill_shard(shard, events, seed, idx);
            }
        }

        let mut merged = factory();
        for (idx, shard) in shards.iter().enumerate() {
            merged.merge_from(shard);
            debug!(shard = idx, "merged shard");
        }
        merged
    }
}

fn fill_shard<S: WinStat>(shard: &mut S, events: usize, base_seed: u64, idx: usize) {
    let mut rng = StdRng::seed_from_u64(shard_seed(base_seed, idx));
    fill(shard, events, &mut rng);
    debug!(shard = idx, events, "filled shard");
}

/// Runs the default simulation (10 shards of 50,000 events, 10% tolerance)
/// and prints the merged report and timing line to stdout.
///
/// Returns the elapsed wall-clock milliseconds, or
/// [`SimulationError::MissingFactory`] when `factory` is `None`.
pub fn run_simulation<S, F>(factory: Option<F>) -> Result<u64, SimulationError>
where
    S: WinStat + Send,
    F: Fn() -> S,
{
    let simulation = Simulation::new(SimulationConfig::default())?;
    let stdout = io::stdout();
    simulation.run_and_report(factory, &mut stdout.lock())
}
