//! Win-amount histogram with additive merge.
//!
//! Amounts are quantized to one decimal place (round half away from zero)
//! and stored as integer tenths, so bucket lookup never depends on float
//! equality and report totals are exact.

use std::collections::BTreeMap;
use std::fmt;

use crate::stat::WinStat;
use crate::util::{TENTHS_PER_UNIT, quantize_tenths, scaled_div_round};

/// A quantized win amount, in tenths of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WinKey(u64);

impl WinKey {
    /// Quantizes `amount`. Negative and non-finite amounts have no key, and
    /// neither do amounts of `2^64` tenths (about `1.8e18`) or more.
    pub fn from_amount(amount: f64) -> Option<Self> {
        quantize_tenths(amount).map(Self)
    }

    /// Builds a key directly from a count of tenths.
    pub fn from_tenths(tenths: u64) -> Self {
        Self(tenths)
    }

    pub fn tenths(self) -> u64 {
        self.0
    }

    /// The bucket's amount as a float (`2.5` for 25 tenths).
    pub fn amount(self) -> f64 {
        self.0 as f64 / TENTHS_PER_UNIT as f64
    }
}

impl fmt::Display for WinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}",
            self.0 / TENTHS_PER_UNIT,
            self.0 % TENTHS_PER_UNIT
        )
    }
}

/// Frequency counter from quantized win amount to accumulated hit count.
///
/// Every instance owns its own buckets; histograms only ever share data
/// through [`merge_from`](Self::merge_from). Stored counts are always
/// positive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WinHistogram {
    counts: BTreeMap<WinKey, u64>,
}

impl WinHistogram {
    /// Creates an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `hit_count` hits to the bucket of `win_amount`.
    ///
    /// Negative or non-finite amounts, amounts too large for a [`WinKey`]
    /// (`1.8e18` and above) and non-positive hit counts are silently ignored.
    /// Counts saturate instead of overflowing.
    pub fn log(&mut self, win_amount: f64, hit_count: i64) {
        let Ok(hits) = u64::try_from(hit_count) else {
            return;
        };
        if hits == 0 {
            return;
        }
        let Some(key) = WinKey::from_amount(win_amount) else {
            return;
        };
        self.add_to_key(key, hits);
    }

    /// Returns the hits recorded for the bucket `win_amount` quantizes to.
    ///
    /// Amounts [`log`](Self::log) would ignore always return 0.
    pub fn hit_count(&self, win_amount: f64) -> u64 {
        WinKey::from_amount(win_amount)
            .and_then(|key| self.counts.get(&key).copied())
            .unwrap_or(0)
    }

    /// Merges `other` into `self` by adding its count to every matching bucket.
    ///
    /// The fold is plain summation: merging the same histogram twice doubles
    /// its contribution. `other` is left untouched.
    pub fn merge_from(&mut self, other: &WinHistogram) {
        for (&key, &hits) in &other.counts {
            self.add_to_key(key, hits);
        }
    }

    /// Sum of all hit counts, saturating at `u128::MAX`.
    pub fn total_hits(&self) -> u128 {
        self.counts
            .values()
            .fold(0u128, |acc, &hits| acc.saturating_add(u128::from(hits)))
    }

    /// Number of distinct buckets.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Buckets in ascending amount order.
    pub fn iter(&self) -> impl Iterator<Item = (WinKey, u64)> + '_ {
        self.counts.iter().map(|(&key, &hits)| (key, hits))
    }

    /// Removes all buckets.
    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// Summarizes the histogram.
    ///
    /// Totals are computed in integer tenths and saturate at `u128::MAX`; the
    /// average is rounded half away from zero to three decimals and is `None`
    /// when no hits were recorded.
    pub fn report(&self) -> WinReport {
        let mut total_win_tenths: u128 = 0;
        for (&key, &hits) in &self.counts {
            // u64 * u64 always fits in u128; only the sum can overflow.
            total_win_tenths =
                total_win_tenths.saturating_add(u128::from(key.0) * u128::from(hits));
        }
        let total_hits = self.total_hits();

        let average_win_milli = (total_hits > 0).then(|| {
            scaled_div_round(
                total_win_tenths,
                u128::from(1000 / TENTHS_PER_UNIT),
                total_hits,
            )
        });

        WinReport {
            total_win_tenths,
            total_hits,
            average_win_milli,
            smallest_non_zero: self.counts.keys().copied().find(|key| key.0 > 0),
            largest: self.counts.keys().next_back().copied(),
            entries: self.iter().collect(),
        }
    }

    /// Renders [`report`](Self::report) as multi-line text.
    pub fn render_report(&self) -> String {
        self.report().to_string()
    }

    fn add_to_key(&mut self, key: WinKey, hits: u64) {
        let slot = self.counts.entry(key).or_insert(0);
        *slot = slot.saturating_add(hits);
    }
}

impl WinStat for WinHistogram {
    fn log(&mut self, win_amount: f64, hit_count: i64) {
        WinHistogram::log(self, win_amount, hit_count);
    }

    fn hit_count(&self, win_amount: f64) -> u64 {
        WinHistogram::hit_count(self, win_amount)
    }

    fn merge_from(&mut self, other: &Self) {
        WinHistogram::merge_from(self, other);
    }

    fn render_report(&self) -> String {
        WinHistogram::render_report(self)
    }
}

/// Summary of a [`WinHistogram`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinReport {
    /// Sum of `amount * hits` over all buckets, in tenths.
    pub total_win_tenths: u128,
    pub total_hits: u128,
    /// Average win in thousandths; `None` for an empty histogram.
    pub average_win_milli: Option<u128>,
    pub smallest_non_zero: Option<WinKey>,
    pub largest: Option<WinKey>,
    /// Every bucket in ascending amount order.
    pub entries: Vec<(WinKey, u64)>,
}

impl WinReport {
    pub fn total_win(&self) -> f64 {
        self.total_win_tenths as f64 / TENTHS_PER_UNIT as f64
    }

    pub fn average_win(&self) -> Option<f64> {
        self.average_win_milli.map(|milli| milli as f64 / 1000.0)
    }
}

impl fmt::Display for WinReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = u128::from(TENTHS_PER_UNIT);
        writeln!(
            f,
            "Total win amount: {}.{}.",
            self.total_win_tenths / unit,
            self.total_win_tenths % unit
        )?;
        writeln!(f, "Total hits: {}.", self.total_hits)?;
        match self.average_win_milli {
            Some(milli) => writeln!(
                f,
                "The average win amount: {}.{:03}.",
                milli / 1000,
                milli % 1000
            )?,
            None => writeln!(f, "The average win amount: no data.")?,
        }
        writeln!(
            f,
            "The smallest non-zero win is {}, the biggest is {}.",
            OrNoData(self.smallest_non_zero),
            OrNoData(self.largest)
        )?;
        writeln!(f, "All unique wins (sorted ascending):")?;
        for (idx, (key, hits)) in self.entries.iter().enumerate() {
            writeln!(f, "{}. {}: {}", idx + 1, key, hits)?;
        }
        Ok(())
    }
}

struct OrNoData(Option<WinKey>);

impl fmt::Display for OrNoData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(key) => fmt::Display::fmt(&key, f),
            None => f.write_str("no data"),
        }
    }
}
