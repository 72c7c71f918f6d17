//! Mergeable win-amount histograms and a Monte-Carlo self-test for them.
//!
//! [`WinHistogram`] counts hits per win amount, quantized to one decimal
//! place, and merges additively so shards filled independently can be
//! combined later. [`Simulation`] exercises any [`WinStat`] implementation
//! end to end: it fills several shards with a known random distribution,
//! folds them into one histogram and checks every bucket against its expected
//! frequency within a relative tolerance.
//!
//! ```
//! use win_statistics::{Simulation, SimulationConfig, WinHistogram};
//!
//! let simulation = Simulation::new(SimulationConfig::default().with_seed(7))?;
//! let outcome = simulation.run(Some(WinHistogram::new))?;
//! assert!(outcome.merged.hit_count(4.1) == 0);
//! # Ok::<(), win_statistics::SimulationError>(())
//! ```

mod error;
mod histogram;
mod simulation;
mod stat;
mod util;

pub use error::SimulationError;
pub use histogram::{WinHistogram, WinKey, WinReport};
pub use simulation::{
    DEFAULT_EVENTS_PER_SHARD, DEFAULT_SHARD_COUNT, DEFAULT_TOLERANCE, Expectation, Simulation,
    SimulationConfig, SimulationOutcome, expectations, fill, run_simulation, verify,
};
pub use stat::WinStat;
