//! Calendar date helpers shared by the store and the refresh logic.
//!
//! All persisted dates are ISO `YYYY-MM-DD` strings. Only calendar days matter here;
//! there is no time-of-day or time zone component anywhere in the cache.

use chrono::{Days, NaiveDate};

use crate::store::StoreError;

const ISO_DATE: &str = "%Y-%m-%d";

/// Days per year of lookback. Leap days are ignored, so the window drifts by a day every
/// four years of lookback.
pub const DAYS_PER_YEAR: u64 = 365;

/// Formats a date the way it is stored.
pub fn to_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

/// Parses a stored date.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(value, ISO_DATE).map_err(|_| StoreError::InvalidDate {
        value: value.to_string(),
    })
}

/// Returns `(today - 365 * years, today)`, or `None` when the start underflows the
/// calendar.
pub fn lookback_window(today: NaiveDate, years: u32) -> Option<(NaiveDate, NaiveDate)> {
    let days = DAYS_PER_YEAR.checked_mul(u64::from(years))?;
    let start = today.checked_sub_days(Days::new(days))?;
    Some((start, today))
}
