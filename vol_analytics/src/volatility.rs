//! Log returns and rolling annualized volatility.
//!
//! Rolling windows are positional: a window of 30 is the last 30 rows of the series,
//! whatever calendar gaps lie between them. A window containing a missing return
//! yields no value.

use chrono::NaiveDate;
use price_ingestor::models::bar::Bar;

/// Annualization factor for daily returns.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Short volatility window, in rows.
pub const SHORT_WINDOW: usize = 30;

/// Long volatility window, in rows.
pub const LONG_WINDOW: usize = 90;

/// One row that has both rolling volatilities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolPoint {
    /// Position of the row in the input series.
    pub index: usize,
    /// Date of the row.
    pub date: NaiveDate,
    /// Annualized 30-row volatility.
    pub vol_30d: f64,
    /// Annualized 90-row volatility.
    pub vol_90d: f64,
}

/// `ln(adj[t] / adj[t-1])` per row. The first row, and any row whose ratio is not a
/// finite positive number, has no return.
pub fn log_returns(bars: &[Bar]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let ret = i
            .checked_sub(1)
            .map(|prev| (bar.adjusted_close / bars[prev].adjusted_close).ln())
            .filter(|r| r.is_finite());
        out.push(ret);
    }
    out
}

/// Sample standard deviation (divisor `n - 1`) over each trailing window of `window`
/// rows.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|end| {
            let start = (end + 1).checked_sub(window)?;
            let slice: Option<Vec<f64>> = values[start..=end].iter().copied().collect();
            slice.map(|xs| sample_std(&xs))
        })
        .collect()
}

fn sample_std(xs: &[f64]) -> f64 {
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let ss: f64 = xs.iter().map(|x| (x - mean).powi(2)).sum();
    (ss / (n - 1.0)).sqrt()
}

/// Rows where both the 30- and 90-row annualized volatilities exist, in input order.
pub fn rolling_volatility(bars: &[Bar]) -> Vec<VolPoint> {
    let returns = log_returns(bars);
    let annualize = TRADING_DAYS_PER_YEAR.sqrt();
    let short = rolling_std(&returns, SHORT_WINDOW);
    let long = rolling_std(&returns, LONG_WINDOW);

    bars.iter()
        .zip(short.into_iter().zip(long))
        .enumerate()
        .filter_map(|(index, (bar, pair))| match pair {
            (Some(s), Some(l)) => Some(VolPoint {
                index,
                date: bar.date,
                vol_30d: s * annualize,
                vol_90d: l * annualize,
            }),
            _ => None,
        })
        .collect()
}
