//! Typed chart payload and its normalization into bars.
//!
//! Every field the vendor may omit is an `Option` or defaults to empty.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use tracing::debug;

use crate::{
    models::{bar::Bar, bar_series::BarSeries},
    providers::{NoPriceDataSnafu, ProviderError, TickerNotFoundSnafu},
};

#[derive(Deserialize, Debug)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Deserialize, Debug)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    #[serde(default)]
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug, Default)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
    #[serde(default)]
    pub adjclose: Option<Vec<AdjClose>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<u64>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

/// Where a day's adjusted close comes from.
enum AdjustedSource {
    /// The payload carries an adjusted-close block.
    Reported(Vec<Option<f64>>),
    /// No adjusted-close block at all; every day uses its raw close.
    CloseOnly,
}

impl AdjustedSource {
    fn from_indicators(adjclose: Option<Vec<AdjClose>>) -> Self {
        match adjclose.and_then(|blocks| blocks.into_iter().next()) {
            Some(block) if !block.adjclose.is_empty() => AdjustedSource::Reported(block.adjclose),
            _ => AdjustedSource::CloseOnly,
        }
    }

    fn at(&self, i: usize, close: f64) -> f64 {
        match self {
            AdjustedSource::Reported(values) => values.get(i).copied().flatten().unwrap_or(close),
            AdjustedSource::CloseOnly => close,
        }
    }
}

fn value_at<T: Copy>(values: &[Option<T>], i: usize) -> Option<T> {
    values.get(i).copied().flatten()
}

/// Truncates a Unix timestamp to its UTC calendar date.
fn to_date(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

impl ChartResponse {
    /// Normalizes the payload into a series for `ticker` (already uppercase).
    ///
    /// Errors:
    /// - [`ProviderError::TickerNotFound`] when there is no result entry.
    /// - [`ProviderError::NoPriceData`] when the entry has no timestamps or quotes.
    ///
    /// Days without a close are skipped; such rows are the vendor's placeholders for
    /// sessions without trades. A missing open, high or low takes the day's close.
    pub fn into_bar_series(self, ticker: &str) -> Result<BarSeries, ProviderError> {
        if let Some(err) = &self.chart.error {
            debug!(ticker, code = %err.code, description = ?err.description, "chart payload carried an error");
        }

        let Some(result) = self.chart.result.and_then(|r| r.into_iter().next()) else {
            return TickerNotFoundSnafu { ticker }.fail();
        };

        let timestamps = match result.timestamp {
            Some(ts) if !ts.is_empty() => ts,
            _ => return NoPriceDataSnafu { ticker }.fail(),
        };

        let Indicators { quote, adjclose } = result.indicators;
        let Some(quote) = quote.into_iter().next() else {
            return NoPriceDataSnafu { ticker }.fail();
        };
        let adjusted = AdjustedSource::from_indicators(adjclose);

        let mut bars = Vec::with_capacity(timestamps.len());
        let mut skipped = 0usize;

        for (i, &ts) in timestamps.iter().enumerate() {
            let (Some(date), Some(close)) = (to_date(ts), value_at(&quote.close, i)) else {
                skipped += 1;
                continue;
            };

            bars.push(Bar {
                date,
                open: value_at(&quote.open, i).unwrap_or(close),
                high: value_at(&quote.high, i).unwrap_or(close),
                low: value_at(&quote.low, i).unwrap_or(close),
                close,
                adjusted_close: adjusted.at(i, close),
                volume: value_at(&quote.volume, i).unwrap_or(0),
            });
        }

        if skipped > 0 {
            debug!(ticker, skipped, kept = bars.len(), "dropped chart rows without a close");
        }

        Ok(BarSeries::new(ticker, bars))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: serde_json::Value) -> ChartResponse {
        serde_json::from_value(value).unwrap()
    }

    fn full_payload() -> serde_json::Value {
        json!({
            "chart": {
                "result": [{
                    "timestamp": [1704067200, 1704153600, 1704240000],
                    "indicators": {
                        "quote": [{
                            "open": [100.0, 101.0, 102.0],
                            "high": [105.0, 106.0, 107.0],
                            "low": [95.0, 96.0, 97.0],
                            "close": [102.0, 103.0, 104.0],
                            "volume": [1000000, 1100000, 1200000]
                        }],
                        "adjclose": [{ "adjclose": [101.0, 102.0, 103.0] }]
                    }
                }],
                "error": null
            }
        })
    }

    #[test]
    fn normalizes_full_payload() {
        let series = parse(full_payload()).into_bar_series("AAPL").unwrap();

        assert_eq!(series.ticker, "AAPL");
        assert_eq!(series.len(), 3);
        let first = &series.bars[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(first.open, 100.0);
        assert_eq!(first.close, 102.0);
        assert_eq!(first.adjusted_close, 101.0);
        assert_eq!(first.volume, 1_000_000);
        assert!(series.is_date_ascending());
    }

    #[test]
    fn empty_result_array_is_ticker_not_found() {
        let err = parse(json!({ "chart": { "result": [] } }))
            .into_bar_series("INVALID")
            .unwrap_err();
        assert!(matches!(err, ProviderError::TickerNotFound { .. }));
    }

    #[test]
    fn null_result_with_error_is_ticker_not_found() {
        let payload = json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        });
        let err = parse(payload).into_bar_series("GONE").unwrap_err();
        assert!(matches!(err, ProviderError::TickerNotFound { .. }));
    }

    #[test]
    fn empty_timestamps_is_no_price_data() {
        let payload = json!({
            "chart": { "result": [{ "timestamp": [], "indicators": { "quote": [{}] } }] }
        });
        let err = parse(payload).into_bar_series("TEST").unwrap_err();
        assert!(matches!(err, ProviderError::NoPriceData { .. }));
        assert_eq!(err.to_string(), "No price data found for ticker: TEST");
    }

    #[test]
    fn missing_timestamps_is_no_price_data() {
        let payload = json!({ "chart": { "result": [{ "indicators": { "quote": [] } }] } });
        let err = parse(payload).into_bar_series("TEST").unwrap_err();
        assert!(matches!(err, ProviderError::NoPriceData { .. }));
    }

    #[test]
    fn missing_adjclose_falls_back_to_close() {
        let payload = json!({
            "chart": {
                "result": [{
                    "timestamp": [1704067200],
                    "indicators": {
                        "quote": [{
                            "open": [100.0], "high": [105.0], "low": [95.0],
                            "close": [102.0], "volume": [1000000]
                        }]
                    }
                }]
            }
        });
        let series = parse(payload).into_bar_series("AAPL").unwrap();
        assert_eq!(series.bars[0].adjusted_close, 102.0);
    }

    #[test]
    fn null_adjclose_entry_falls_back_per_day() {
        let mut payload = full_payload();
        payload["chart"]["result"][0]["indicators"]["adjclose"][0]["adjclose"] =
            json!([101.0, null, 103.0]);
        let series = parse(payload).into_bar_series("AAPL").unwrap();
        assert_eq!(series.bars[1].adjusted_close, 103.0);
        assert_eq!(series.bars[2].adjusted_close, 103.0);
    }

    #[test]
    fn null_volume_defaults_to_zero() {
        let mut payload = full_payload();
        payload["chart"]["result"][0]["indicators"]["quote"][0]["volume"] =
            json!([1000000, null, 1200000]);
        let series = parse(payload).into_bar_series("AAPL").unwrap();
        assert_eq!(series.bars[1].volume, 0);
        assert_eq!(series.bars[2].volume, 1_200_000);
    }

    #[test]
    fn missing_open_high_low_take_the_close() {
        let mut payload = full_payload();
        let quote = &mut payload["chart"]["result"][0]["indicators"]["quote"][0];
        quote["open"] = json!([100.0, null, 102.0]);
        quote["high"] = json!([105.0, null, 107.0]);
        quote["low"] = json!([95.0, 96.0, null]);
        let series = parse(payload).into_bar_series("AAPL").unwrap();

        assert_eq!(series.len(), 3);
        let day = &series.bars[1];
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!((day.open, day.high, day.low), (103.0, 103.0, 96.0));
        assert_eq!(day.adjusted_close, 102.0);
        assert_eq!(series.bars[2].low, 104.0);
    }

    #[test]
    fn rows_without_a_close_are_skipped() {
        let mut payload = full_payload();
        let quote = &mut payload["chart"]["result"][0]["indicators"]["quote"][0];
        quote["open"] = json!([100.0, null, 102.0]);
        quote["close"] = json!([102.0, null, 104.0]);
        let series = parse(payload).into_bar_series("AAPL").unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn intraday_timestamps_truncate_to_calendar_date() {
        let mut payload = full_payload();
        // 2024-01-02 14:30:00 UTC
        payload["chart"]["result"][0]["timestamp"] = json!([1704067200, 1704205800, 1704240000]);
        let series = parse(payload).into_bar_series("AAPL").unwrap();
        assert_eq!(series.bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }
}
