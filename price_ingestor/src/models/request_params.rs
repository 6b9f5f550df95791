use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::bar_series::normalize_ticker;

/// Parameters for requesting daily bars from any provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarsRequestParams {
    /// Ticker to request, already uppercased (see [`BarsRequestParams::new`]).
    pub ticker: String,

    /// First calendar day of the window (inclusive).
    pub start: NaiveDate,

    /// Last calendar day of the window (inclusive).
    ///
    /// Providers return whatever trading days they hold inside the window, which may
    /// be narrower than requested at either edge.
    pub end: NaiveDate,
}

impl BarsRequestParams {
    pub fn new(ticker: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            ticker: normalize_ticker(ticker),
            start,
            end,
        }
    }
}
