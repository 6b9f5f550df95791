#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use price_cache::{
    db::{connection, migrate},
    store::{BarStore, SqliteBarStore},
};
use price_ingestor::{
    models::{bar::Bar, bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{DataProvider, ProviderError, TickerNotFoundSnafu},
};
use tempfile::TempDir;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}

pub struct TestDb {
    _dir: TempDir,    // keep alive for the life of the test
    pub path: String, // <tmpdir>/test.db
}

fn temp_path() -> TestDb {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();
    TestDb { _dir: dir, path }
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let db = temp_path();
    migrate::run_sqlite(&db.path).expect("migrations");

    // open a connection with PRAGMAs applied
    let conn = connection::connect_sqlite(&db.path).expect("connect");
    (db, conn)
}

/// Opens a store on a fresh temp file and runs `initialize`.
pub fn setup_store() -> (TestDb, Arc<SqliteBarStore>) {
    let db = temp_path();
    let store = SqliteBarStore::open(&db.path).expect("open store");
    store.initialize().expect("initialize");
    (db, Arc::new(store))
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal"); // WAL is persistent per DB file

    let fk: ForeignKeys = sql_query("PRAGMA foreign_keys;").get_result(conn).unwrap();
    assert_eq!(fk.foreign_keys, 1);

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn bar(date: NaiveDate, close: f64) -> Bar {
    Bar {
        date,
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        adjusted_close: close,
        volume: 1_000,
    }
}

/// One bar per calendar day, `count` days ending at `last`.
pub fn daily_bars(last: NaiveDate, count: u64) -> Vec<Bar> {
    (0..count)
        .rev()
        .map(|back| {
            let date = last - Days::new(back);
            bar(date, 100.0 + (count - back) as f64)
        })
        .collect()
}

/// What a [`CountingProvider`] answers with.
#[derive(Clone)]
pub enum Canned {
    Bars(Vec<Bar>),
    NotFound,
}

/// Fake provider that records every request it receives.
pub struct CountingProvider {
    canned: Canned,
    calls: AtomicUsize,
    last: std::sync::Mutex<Option<BarsRequestParams>>,
}

impl CountingProvider {
    pub fn new(canned: Canned) -> Arc<Self> {
        Arc::new(Self {
            canned,
            calls: AtomicUsize::new(0),
            last: std::sync::Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<BarsRequestParams> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl DataProvider for CountingProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(params.clone());
        match &self.canned {
            Canned::Bars(bars) => Ok(BarSeries::new(&params.ticker, bars.clone())),
            Canned::NotFound => TickerNotFoundSnafu {
                ticker: params.ticker,
            }
            .fail(),
        }
    }
}
