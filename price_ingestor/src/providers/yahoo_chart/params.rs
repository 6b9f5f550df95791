use chrono::NaiveDate;

use crate::models::request_params::BarsRequestParams;

/// Path prefix of the chart endpoint, relative to the configured base URL.
pub const CHART_PATH: &str = "/v8/finance/chart";

/// Builds the chart URL for an (already uppercase) ticker.
pub fn chart_url(base_url: &str, ticker: &str) -> String {
    format!("{}{CHART_PATH}/{ticker}", base_url.trim_end_matches('/'))
}

/// First second of `day` in UTC, as a Unix timestamp.
fn day_start_ts(day: NaiveDate) -> i64 {
    day.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

/// Last second of `day` in UTC, as a Unix timestamp.
fn day_end_ts(day: NaiveDate) -> i64 {
    day_start_ts(day) + 86_399
}

/// Query pairs for one daily-interval request covering `[start, end]`.
pub fn construct_params(params: &BarsRequestParams) -> Vec<(String, String)> {
    vec![
        ("period1".to_string(), day_start_ts(params.start).to_string()),
        ("period2".to_string(), day_end_ts(params.end).to_string()),
        ("interval".to_string(), "1d".to_string()),
        ("events".to_string(), "history".to_string()),
    ]
}
