use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::upsert::excluded;
use price_ingestor::models::{
    bar::Bar,
    bar_series::{BarSeries, normalize_ticker},
};
use tracing::{debug, instrument};

use crate::{
    dates::{parse_iso_date, to_iso_date},
    db::{connection::connect_sqlite, migrate},
    models::{MetadataRow, NewPriceRow, PriceRow},
    store::{BarStore, StoreError},
};

/// SQLite-backed [`BarStore`].
///
/// All access goes through one connection behind a mutex, so writes from this process
/// are serialized. Multi-statement writes additionally run in `BEGIN IMMEDIATE`
/// transactions.
pub struct SqliteBarStore {
    conn: Mutex<SqliteConnection>,
}

impl SqliteBarStore {
    /// Opens (creating if needed) the database at `database_url`.
    ///
    /// The schema is not touched; call [`BarStore::initialize`] once before use.
    pub fn open(database_url: &str) -> Result<Self, StoreError> {
        let conn = connect_sqlite(database_url).map_err(|e| StoreError::Open(format!("{e:#}")))?;
        Ok(Self::from_connection(conn))
    }

    /// Wraps an already configured connection.
    pub fn from_connection(conn: SqliteConnection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SqliteConnection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn upsert_rows(conn: &mut SqliteConnection, symbol: &str, bars: &[Bar]) -> Result<usize, StoreError> {
    use crate::schema::daily_prices::dsl::*;

    let mut written = 0;
    for bar in bars {
        let row = NewPriceRow::from_bar(symbol, bar)?;
        written += diesel::insert_into(daily_prices)
            .values(&row)
            .on_conflict((ticker, date))
            .do_update()
            .set((
                open.eq(excluded(open)),
                high.eq(excluded(high)),
                low.eq(excluded(low)),
                close.eq(excluded(close)),
                adj_close.eq(excluded(adj_close)),
                volume.eq(excluded(volume)),
            ))
            .execute(conn)?;
    }
    Ok(written)
}

fn upsert_marker(conn: &mut SqliteConnection, symbol: &str, day: NaiveDate) -> Result<(), StoreError> {
    use crate::schema::cache_metadata::dsl::*;

    let row = MetadataRow {
        ticker: symbol.to_string(),
        last_updated: to_iso_date(day),
    };
    diesel::insert_into(cache_metadata)
        .values(&row)
        .on_conflict(ticker)
        .do_update()
        .set(last_updated.eq(excluded(last_updated)))
        .execute(conn)?;
    Ok(())
}

impl BarStore for SqliteBarStore {
    fn initialize(&self) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let applied =
            migrate::run_pending(&mut conn).map_err(|e| StoreError::Migration(format!("{e:#}")))?;
        debug!(applied, "price cache schema ready");
        Ok(())
    }

    #[instrument(skip(self))]
    fn read_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BarSeries, StoreError> {
        use crate::schema::daily_prices::dsl::*;

        let symbol = normalize_ticker(symbol);
        let mut conn = self.lock()?;

        // ISO text compares in calendar order.
        let rows: Vec<PriceRow> = daily_prices
            .filter(ticker.eq(&symbol))
            .filter(date.ge(to_iso_date(start)))
            .filter(date.le(to_iso_date(end)))
            .order(date.asc())
            .select(PriceRow::as_select())
            .load(&mut *conn)?;

        let bars = rows
            .into_iter()
            .map(PriceRow::into_bar)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(rows = bars.len(), "read stored bars");
        Ok(BarSeries::new(&symbol, bars))
    }

    fn upsert_batch(&self, symbol: &str, bars: &[Bar]) -> Result<(), StoreError> {
        if bars.is_empty() {
            return Ok(());
        }
        let symbol = normalize_ticker(symbol);
        let mut conn = self.lock()?;
        conn.immediate_transaction(|conn| upsert_rows(conn, &symbol, bars).map(|_| ()))
    }

    fn get_freshness(&self, symbol: &str) -> Result<Option<NaiveDate>, StoreError> {
        use crate::schema::cache_metadata::dsl::*;

        let symbol = normalize_ticker(symbol);
        let mut conn = self.lock()?;
        let stored: Option<String> = cache_metadata
            .filter(ticker.eq(&symbol))
            .select(last_updated)
            .first(&mut *conn)
            .optional()?;

        stored.as_deref().map(parse_iso_date).transpose()
    }

    fn set_freshness(&self, symbol: &str, day: NaiveDate) -> Result<(), StoreError> {
        let symbol = normalize_ticker(symbol);
        let mut conn = self.lock()?;
        upsert_marker(&mut conn, &symbol, day)
    }

    #[instrument(skip(self, bars), fields(bars = bars.len()))]
    fn record_refresh(&self, symbol: &str, bars: &[Bar], day: NaiveDate) -> Result<(), StoreError> {
        if bars.is_empty() {
            return Ok(());
        }
        let symbol = normalize_ticker(symbol);
        let mut conn = self.lock()?;
        let written = conn.immediate_transaction(|conn| {
            let written = upsert_rows(conn, &symbol, bars)?;
            upsert_marker(conn, &symbol, day)?;
            Ok::<_, StoreError>(written)
        })?;
        debug!(written, refreshed = %day, "recorded refresh");
        Ok(())
    }
}
