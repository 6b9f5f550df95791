//! Volatility analytics over a date-ascending series of daily bars.
//!
//! [`analyze`] is a pure function: it reads the series and a caller-supplied date, never
//! the clock or the store, and produces a [`report::VolatilityReport`] ready to serialize.

pub mod percentile;
pub mod report;
pub mod returns;
pub mod rsi;
pub mod volatility;

mod rounding;

pub use report::{VolatilityReport, analyze};

/// Errors raised while computing a report.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// Fewer rows than the long volatility window needs.
    #[error("Not enough data to calculate volatility for {ticker}")]
    InsufficientHistory {
        /// Uppercase ticker.
        ticker: String,
    },
}
