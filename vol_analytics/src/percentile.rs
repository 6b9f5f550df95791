//! Empirical percentile ranking and bucketing of a volatility history.

use serde::{Deserialize, Serialize};

/// Where the current value sits relative to the p50/p90/p99 thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    /// Strictly below p50.
    #[serde(rename = "<p50")]
    BelowP50,
    /// At least p50, strictly below p90.
    #[serde(rename = "p50-p90")]
    P50ToP90,
    /// At least p90, strictly below p99.
    #[serde(rename = "p90-p99")]
    P90ToP99,
    /// At or above p99.
    #[serde(rename = ">p99")]
    AboveP99,
}

impl Bucket {
    /// The label used in serialized reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::BelowP50 => "<p50",
            Bucket::P50ToP90 => "p50-p90",
            Bucket::P90ToP99 => "p90-p99",
            Bucket::AboveP99 => ">p99",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quantile thresholds of one horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Median.
    pub p50: f64,
    /// 90th percentile.
    pub p90: f64,
    /// 99th percentile.
    pub p99: f64,
}

impl Thresholds {
    /// Thresholds of `values`, or `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            p50: quantile(&sorted, 0.50)?,
            p90: quantile(&sorted, 0.90)?,
            p99: quantile(&sorted, 0.99)?,
        })
    }

    /// First threshold that `value` is strictly below decides the bucket.
    pub fn bucket(&self, value: f64) -> Bucket {
        if value < self.p50 {
            Bucket::BelowP50
        } else if value < self.p90 {
            Bucket::P50ToP90
        } else if value < self.p99 {
            Bucket::P90ToP99
        } else {
            Bucket::AboveP99
        }
    }
}

/// Quantile `q` of an ascending slice by linear interpolation between closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Share of `values` less than or equal to `current`, as a percentage.
pub fn percentile_rank(values: &[f64], current: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let at_or_below = values.iter().filter(|v| **v <= current).count();
    at_or_below as f64 / values.len() as f64 * 100.0
}

/// Ranking of the latest value of one horizon against its own history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizonStats {
    /// The last value of the history.
    pub current: f64,
    /// [`percentile_rank`] of `current`.
    pub percentile: f64,
    /// Quantile thresholds of the history.
    pub thresholds: Thresholds,
    /// Bucket of `current` under `thresholds`.
    pub bucket: Bucket,
}

impl HorizonStats {
    /// Ranks the last element of `history` against all of it. `None` when empty.
    pub fn from_history(history: &[f64]) -> Option<Self> {
        let current = *history.last()?;
        let thresholds = Thresholds::from_values(history)?;
        Some(Self {
            current,
            percentile: percentile_rank(history, current),
            bucket: thresholds.bucket(current),
            thresholds,
        })
    }
}
