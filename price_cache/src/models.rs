//! Diesel models mapping to the database schema.
//!
//! These types mirror the tables defined in the embedded migrations and in
//! [`crate::schema`]:
//! - [`crate::schema::daily_prices`]: one OHLCV row per ticker and trading day
//! - [`crate::schema::cache_metadata`]: the per-ticker refresh marker
//!
//! Dates are stored as ISO `YYYY-MM-DD` text so lexical order matches calendar order.

use diesel::prelude::*;
use price_ingestor::models::bar::Bar;

use crate::{
    dates::{parse_iso_date, to_iso_date},
    schema::*,
    store::StoreError,
};

/// A row in [`crate::schema::daily_prices`].
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = daily_prices, check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceRow {
    /// Uppercase ticker symbol.
    pub ticker: String,
    /// Trading day, `YYYY-MM-DD`.
    pub date: String,
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Split and dividend adjusted close.
    pub adj_close: f64,
    /// Shares traded.
    pub volume: i64,
}

impl PriceRow {
    /// Converts the stored row back into a [`Bar`].
    pub fn into_bar(self) -> Result<Bar, StoreError> {
        Ok(Bar {
            date: parse_iso_date(&self.date)?,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            adjusted_close: self.adj_close,
            // The schema CHECK keeps this non-negative.
            volume: u64::try_from(self.volume).unwrap_or(0),
        })
    }
}

/// Insertable form of [`PriceRow`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = daily_prices)]
pub struct NewPriceRow<'a> {
    /// Uppercase ticker symbol.
    pub ticker: &'a str,
    /// Trading day, `YYYY-MM-DD`.
    pub date: String,
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Split and dividend adjusted close.
    pub adj_close: f64,
    /// Shares traded.
    pub volume: i64,
}

impl<'a> NewPriceRow<'a> {
    /// Builds the row for `bar` under an already-normalized ticker.
    pub fn from_bar(ticker: &'a str, bar: &Bar) -> Result<Self, StoreError> {
        let volume = i64::try_from(bar.volume).map_err(|_| StoreError::VolumeOverflow(bar.volume))?;
        Ok(Self {
            ticker,
            date: to_iso_date(bar.date),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            adj_close: bar.adjusted_close,
            volume,
        })
    }
}

/// A row in [`crate::schema::cache_metadata`].
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = cache_metadata, check_for_backend(diesel::sqlite::Sqlite))]
pub struct MetadataRow {
    /// Uppercase ticker symbol.
    pub ticker: String,
    /// Day of the last successful refresh, `YYYY-MM-DD`.
    pub last_updated: String,
}
