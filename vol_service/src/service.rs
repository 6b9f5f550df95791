//! The request pipeline: ensure history, then analyze.

use std::sync::Arc;

use chrono::NaiveDate;
use price_cache::{
    clock::SystemClock,
    refresh::RefreshOrchestrator,
    store::{BarStore, SqliteBarStore},
};
use price_ingestor::{models::bar_series::normalize_ticker, providers::yahoo_chart::YahooChartProvider};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use vol_analytics::{VolatilityReport, analyze};

use crate::{config::AppConfig, error::ServiceError};

/// Liveness payload, `{"status": "healthy"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

pub struct VolatilityService {
    orchestrator: RefreshOrchestrator,
    default_lookback_years: u32,
}

impl VolatilityService {
    pub fn new(orchestrator: RefreshOrchestrator, default_lookback_years: u32) -> Self {
        Self {
            orchestrator,
            default_lookback_years,
        }
    }

    /// Wires the SQLite store, the chart provider and the system clock from `config`.
    ///
    /// The schema is left alone; call [`initialize`](Self::initialize) before serving.
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceError> {
        let store = SqliteBarStore::open(&config.database_url)?;
        let provider = YahooChartProvider::with_config(config.provider.chart_config())?;
        let orchestrator = RefreshOrchestrator::new(Arc::new(store), Arc::new(provider), Arc::new(SystemClock));
        Ok(Self::new(orchestrator, config.default_lookback_years))
    }

    /// Applies pending schema migrations.
    pub fn initialize(&self) -> Result<(), ServiceError> {
        self.orchestrator.store().initialize()?;
        Ok(())
    }

    /// Full report for `ticker` over `lookback_years` (the configured default when
    /// `None`).
    #[instrument(skip(self))]
    pub async fn get_volatility(
        &self,
        ticker: &str,
        lookback_years: Option<u32>,
    ) -> Result<VolatilityReport, ServiceError> {
        let ticker = normalize_ticker(ticker);
        if ticker.is_empty() {
            return Err(ServiceError::EmptyTicker);
        }
        let years = lookback_years.unwrap_or(self.default_lookback_years);

        let as_of = self.orchestrator.today();
        let series = self.orchestrator.ensure_history(&ticker, years).await?;
        let report = analyze(&series, as_of)?;
        info!(%ticker, vol_30d = report.vol_30d, bucket = %report.vol_30d_bucket, "volatility computed");
        Ok(report)
    }

    /// Date of the last refresh recorded for `ticker`.
    pub fn freshness(&self, ticker: &str) -> Result<Option<NaiveDate>, ServiceError> {
        let ticker = normalize_ticker(ticker);
        if ticker.is_empty() {
            return Err(ServiceError::EmptyTicker);
        }
        Ok(self.orchestrator.store().get_freshness(&ticker)?)
    }

    pub fn health() -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
        }
    }
}
