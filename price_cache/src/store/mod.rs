//! Bar store: durable daily bars plus a per-ticker freshness marker.
//!
//! [`BarStore`] is the portable surface; [`SqliteBarStore`] in `repo.rs` is the only
//! implementation. Every method takes a ticker that may be in any case and uppercases
//! it before touching storage.

mod repo;

pub use repo::SqliteBarStore;

use chrono::NaiveDate;
use price_ingestor::models::{bar::Bar, bar_series::BarSeries};

/// Errors raised by a [`BarStore`].
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Query or transaction failure reported by Diesel.
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// The database could not be opened or configured.
    #[error("failed to open price cache: {0}")]
    Open(String),

    /// Embedded migrations failed to apply.
    #[error("failed to apply price cache migrations: {0}")]
    Migration(String),

    /// A stored date column is not `YYYY-MM-DD`.
    #[error("invalid stored date {value:?}")]
    InvalidDate {
        /// The offending column value.
        value: String,
    },

    /// SQLite integers are signed 64-bit.
    #[error("volume {0} does not fit the store's integer column")]
    VolumeOverflow(u64),

    /// A previous writer panicked while holding the connection.
    #[error("price cache connection lock poisoned")]
    Poisoned,
}

/// Persistence operations the refresh logic relies on.
pub trait BarStore: Send + Sync {
    /// Applies pending schema migrations. Called once at startup.
    fn initialize(&self) -> Result<(), StoreError>;

    /// All stored bars for `ticker` with `start <= date <= end`, ascending by date.
    ///
    /// Unknown tickers yield an empty series.
    fn read_range(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
    -> Result<BarSeries, StoreError>;

    /// Inserts each bar, replacing any existing row with the same `(ticker, date)`.
    ///
    /// An empty slice is a no-op.
    fn upsert_batch(&self, ticker: &str, bars: &[Bar]) -> Result<(), StoreError>;

    /// Date of the last recorded refresh, if any.
    fn get_freshness(&self, ticker: &str) -> Result<Option<NaiveDate>, StoreError>;

    /// Records `date` as the last refresh for `ticker`.
    fn set_freshness(&self, ticker: &str, date: NaiveDate) -> Result<(), StoreError>;

    /// [`upsert_batch`](Self::upsert_batch) followed by
    /// [`set_freshness`](Self::set_freshness).
    ///
    /// The default runs the two calls back to back; implementations with transactions
    /// override it to make the pair atomic. Nothing is written when `bars` is empty.
    fn record_refresh(&self, ticker: &str, bars: &[Bar], date: NaiveDate) -> Result<(), StoreError> {
        if bars.is_empty() {
            return Ok(());
        }
        self.upsert_batch(ticker, bars)?;
        self.set_freshness(ticker, date)
    }
}
