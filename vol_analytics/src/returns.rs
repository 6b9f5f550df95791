//! Simple returns over fixed row offsets plus year-to-date.

use chrono::{Datelike, NaiveDate};
use price_ingestor::models::bar::Bar;
use serde::{Deserialize, Serialize};

use crate::rounding::round_to;

/// Rows back to the reference of the weekly return (5 sessions earlier).
pub const WEEK_ROWS: usize = 6;

/// Rows back to the reference of the monthly return (21 sessions earlier).
pub const MONTH_ROWS: usize = 22;

/// Multi-horizon returns on adjusted close, rounded to 6 decimals.
///
/// A horizon is `None` when the series is too short for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Returns {
    /// Last row against the one before it.
    pub daily: Option<f64>,
    /// Last row against the 6th from last.
    pub week: Option<f64>,
    /// Last row against the 22nd from last.
    pub month: Option<f64>,
    /// Last row against the first row in the `as_of` calendar year.
    pub ytd: Option<f64>,
}

fn simple_return(current: f64, reference: f64) -> Option<f64> {
    let r = (current - reference) / reference;
    r.is_finite().then(|| round_to(r, 6))
}

/// `(last - bars[len - rows]) / bars[len - rows]` when at least `rows` rows exist.
fn trailing(bars: &[Bar], rows: usize) -> Option<f64> {
    let last = bars.last()?;
    let reference = bars.len().checked_sub(rows).map(|i| &bars[i])?;
    simple_return(last.adjusted_close, reference.adjusted_close)
}

/// Computes every horizon over the full series.
///
/// `ytd` is `None` unless some row falls in the calendar year of `as_of`.
pub fn compute_returns(bars: &[Bar], as_of: NaiveDate) -> Returns {
    if bars.len() < 2 {
        return Returns::default();
    }
    let Some(last) = bars.last() else {
        return Returns::default();
    };

    let year = as_of.year();
    let ytd = bars
        .iter()
        .find(|b| b.date.year() == year)
        .and_then(|first| simple_return(last.adjusted_close, first.adjusted_close));

    Returns {
        daily: trailing(bars, 2),
        week: trailing(bars, WEEK_ROWS),
        month: trailing(bars, MONTH_ROWS),
        ytd,
    }
}
