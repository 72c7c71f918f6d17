use std::io::{self, Write};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use win_statistics::{SimulationError, WinHistogram, run_simulation};

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match run_simulation(Some(WinHistogram::new)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "win simulation failed");
            // The filter may be off, so the failure is always printed too.
            let _ = write_failure(&mut io::stderr().lock(), &err);
            ExitCode::FAILURE
        }
    }
}

fn write_failure<W: Write>(out: &mut W, err: &SimulationError) -> io::Result<()> {
    writeln!(out, "error: {err}")
}
