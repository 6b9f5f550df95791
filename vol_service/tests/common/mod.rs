#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use price_cache::{
    clock::FixedClock,
    refresh::RefreshOrchestrator,
    store::{BarStore, SqliteBarStore},
};
use price_ingestor::{
    models::{bar::Bar, bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{DataProvider, ProviderError},
};
use tempfile::TempDir;
use vol_service::VolatilityService;

pub const TODAY: (i32, u32, u32) = (2024, 6, 14);

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(TODAY.0, TODAY.1, TODAY.2).unwrap()
}

/// `count` daily bars ending today on a gently oscillating path.
pub fn history(count: u64) -> Vec<Bar> {
    (0..count)
        .map(|i| {
            let date = today() - Days::new(count - 1 - i);
            let close = 100.0 + 8.0 * ((i as f64) * 0.25).sin() + (i as f64) * 0.02;
            Bar {
                date,
                open: close - 0.4,
                high: close + 1.2,
                low: close - 1.3,
                close,
                adjusted_close: close,
                volume: 5_000,
            }
        })
        .collect()
}

/// Serves the same bars for every ticker and counts calls.
pub struct CannedProvider {
    bars: Vec<Bar>,
    calls: AtomicUsize,
}

impl CannedProvider {
    pub fn new(bars: Vec<Bar>) -> Arc<Self> {
        Arc::new(Self {
            bars,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataProvider for CannedProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(BarSeries::new(&params.ticker, self.bars.clone()))
    }
}

pub struct Harness {
    _dir: TempDir,
    pub db_path: String,
    pub store: Arc<SqliteBarStore>,
    pub service: VolatilityService,
}

/// Service over a migrated temp database, `provider`, and a clock pinned to [`today`].
pub fn harness(provider: Arc<dyn DataProvider>) -> Harness {
    let dir = TempDir::new().expect("tempdir");
    let db_path = dir.path().join("cache.db").to_string_lossy().to_string();
    let store = Arc::new(SqliteBarStore::open(&db_path).expect("open"));
    store.initialize().expect("migrate");

    let orchestrator = RefreshOrchestrator::new(store.clone(), provider, Arc::new(FixedClock(today())));
    Harness {
        _dir: dir,
        db_path,
        store,
        service: VolatilityService::new(orchestrator, 5),
    }
}
