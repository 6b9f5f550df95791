//! Canonical in-memory representation of one trading day (OHLCV).
//!
//! This struct is the standard output of every [`DataProvider`](crate::providers::DataProvider)
//! and the row shape the price cache stores. The ticker lives on the owning
//! [`BarSeries`](crate::models::bar_series::BarSeries).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading day. Any time-of-day component from the source has been dropped.
    pub date: NaiveDate,

    /// Opening price.
    pub open: f64,

    /// Highest price of the day.
    pub high: f64,

    /// Lowest price of the day.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Close adjusted for splits and dividends. Equal to `close` when the source
    /// does not report adjustments.
    pub adjusted_close: f64,

    /// Shares traded. Zero when the source left it blank.
    pub volume: u64,
}
