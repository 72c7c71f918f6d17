//! Runs a reproducible simulation with a parallel fill and prints the
//! merged report.

use win_statistics::{Simulation, SimulationConfig, SimulationError, WinHistogram};

fn main() -> Result<(), SimulationError> {
    let config = SimulationConfig::default()
        .with_seed(2024)
        .with_parallel_fill(true);
    let simulation = Simulation::new(config)?;

    let outcome = simulation.run(Some(WinHistogram::new))?;
    println!(
        "seed {} passed {} checks in {}ms",
        outcome.seed,
        outcome.checks_passed,
        outcome.elapsed_ms()
    );
    print!("{}", outcome.merged.render_report());
    Ok(())
}
