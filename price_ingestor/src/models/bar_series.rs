//! A date-ordered run of daily bars for one ticker.

use crate::models::bar::Bar;

/// Normalizes a ticker to its storage form (trimmed, uppercase).
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

/// Represents a set of daily bars for a single ticker.
///
/// Bars are expected in ascending date order. Gaps (weekends, holidays) are normal;
/// every rolling computation downstream is positional over this order.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    /// The uppercase ticker this data represents (e.g., "AAPL").
    pub ticker: String,
    /// The collection of OHLCV bars.
    pub bars: Vec<Bar>,
}

impl BarSeries {
    /// Builds a series, normalizing the ticker.
    pub fn new(ticker: &str, bars: Vec<Bar>) -> Self {
        Self {
            ticker: normalize_ticker(ticker),
            bars,
        }
    }

    /// An empty series for `ticker`.
    pub fn empty(ticker: &str) -> Self {
        Self::new(ticker, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent bar, if any.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// True when dates strictly increase from one bar to the next.
    pub fn is_date_ascending(&self) -> bool {
        self.bars.windows(2).all(|w| w[0].date < w[1].date)
    }
}
