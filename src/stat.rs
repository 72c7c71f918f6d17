//! The capabilities the simulation driver needs from a win histogram.

/// A mergeable frequency counter keyed by win amount.
///
/// [`Simulation`](crate::Simulation) only talks to histograms through this
/// trait, so any implementation can be put through the fill, merge and
/// verification cycle.
pub trait WinStat {
    /// Adds `hit_count` hits to the bucket of `win_amount`.
    ///
    /// Negative amounts and non-positive hit counts are ignored.
    fn log(&mut self, win_amount: f64, hit_count: i64);

    /// Returns the hits recorded for `win_amount`, or 0.
    fn hit_count(&self, win_amount: f64) -> u64;

    /// Adds every bucket of `other` into `self`.
    fn merge_from(&mut self, other: &Self);

    /// Human-readable summary of the recorded wins.
    fn render_report(&self) -> String;
}
