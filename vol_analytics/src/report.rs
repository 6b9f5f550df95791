//! The serialized analytics payload and the function that builds it.

use chrono::NaiveDate;
use price_ingestor::models::{bar::Bar, bar_series::BarSeries};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    AnalyticsError,
    percentile::{Bucket, HorizonStats, Thresholds},
    returns::{Returns, compute_returns},
    rounding::round_to,
    rsi::{RSI_PERIOD, wilder_rsi},
    volatility::rolling_volatility,
};

/// Rows covered by the monthly high/low.
pub const MONTH_BARS: usize = 21;

/// Rows covered by the yearly high/low and the volatility history.
pub const YEAR_BARS: usize = 252;

/// One retained row of the volatility history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Trading day, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Annualized 30-row volatility, 4 decimals.
    pub vol_30d: f64,
    /// Annualized 90-row volatility, 4 decimals.
    pub vol_90d: f64,
}

/// Thresholds of both horizons, keyed `"30d"` and `"90d"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileThresholds {
    /// 30-row horizon.
    #[serde(rename = "30d")]
    pub short: Thresholds,
    /// 90-row horizon.
    #[serde(rename = "90d")]
    pub long: Thresholds,
}

/// Everything reported for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityReport {
    pub ticker: String,
    pub current_price: f64,
    pub daily_open: f64,
    pub daily_high: f64,
    pub daily_low: f64,
    pub monthly_high: f64,
    pub monthly_low: f64,
    pub yearly_high: f64,
    pub yearly_low: f64,
    pub vol_30d: f64,
    pub vol_90d: f64,
    pub vol_30d_percentile: f64,
    pub vol_90d_percentile: f64,
    pub vol_30d_bucket: Bucket,
    pub vol_90d_bucket: Bucket,
    pub percentile_thresholds: PercentileThresholds,
    pub returns: Returns,
    pub rsi_14d: Option<f64>,
    pub history: Vec<HistoryPoint>,
}

/// Max high and min low over the last `rows` bars, 2 decimals.
fn trailing_range(bars: &[Bar], rows: usize) -> (f64, f64) {
    let tail = &bars[bars.len().saturating_sub(rows)..];
    let high = tail.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let low = tail.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    (round_to(high, 2), round_to(low, 2))
}

fn rounded_thresholds(t: Thresholds) -> Thresholds {
    Thresholds {
        p50: round_to(t.p50, 4),
        p90: round_to(t.p90, 4),
        p99: round_to(t.p99, 4),
    }
}

/// Computes the full report for a date-ascending series as seen on `as_of`.
///
/// `as_of` only selects the calendar year of the `ytd` return.
///
/// Fails with [`AnalyticsError::InsufficientHistory`] when no row has both rolling
/// volatilities, which takes at least 91 rows.
pub fn analyze(series: &BarSeries, as_of: NaiveDate) -> Result<VolatilityReport, AnalyticsError> {
    let bars = series.bars.as_slice();
    let points = rolling_volatility(bars);
    let insufficient = || AnalyticsError::InsufficientHistory {
        ticker: series.ticker.clone(),
    };

    let latest_point = points.last().ok_or_else(insufficient)?;
    let latest = &bars[latest_point.index];

    let short: Vec<f64> = points.iter().map(|p| p.vol_30d).collect();
    let long: Vec<f64> = points.iter().map(|p| p.vol_90d).collect();
    let short_stats = HorizonStats::from_history(&short).ok_or_else(insufficient)?;
    let long_stats = HorizonStats::from_history(&long).ok_or_else(insufficient)?;

    let (monthly_high, monthly_low) = trailing_range(bars, MONTH_BARS);
    let (yearly_high, yearly_low) = trailing_range(bars, YEAR_BARS);

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let history = points[points.len().saturating_sub(YEAR_BARS)..]
        .iter()
        .map(|p| HistoryPoint {
            date: p.date,
            vol_30d: round_to(p.vol_30d, 4),
            vol_90d: round_to(p.vol_90d, 4),
        })
        .collect();

    debug!(ticker = %series.ticker, rows = bars.len(), retained = points.len(), "analyzed series");

    Ok(VolatilityReport {
        ticker: series.ticker.clone(),
        current_price: round_to(latest.close, 2),
        daily_open: round_to(latest.open, 2),
        daily_high: round_to(latest.high, 2),
        daily_low: round_to(latest.low, 2),
        monthly_high,
        monthly_low,
        yearly_high,
        yearly_low,
        vol_30d: round_to(short_stats.current, 4),
        vol_90d: round_to(long_stats.current, 4),
        vol_30d_percentile: round_to(short_stats.percentile, 1),
        vol_90d_percentile: round_to(long_stats.percentile, 1),
        vol_30d_bucket: short_stats.bucket,
        vol_90d_bucket: long_stats.bucket,
        percentile_thresholds: PercentileThresholds {
            short: rounded_thresholds(short_stats.thresholds),
            long: rounded_thresholds(long_stats.thresholds),
        },
        returns: compute_returns(bars, as_of),
        rsi_14d: wilder_rsi(&closes, RSI_PERIOD),
        history,
    })
}
