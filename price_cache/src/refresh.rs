//! Refresh orchestration: serve bars from the store when they are fresh, otherwise
//! fetch the lookback window from the provider and persist it.

use std::sync::Arc;

use chrono::NaiveDate;
use price_ingestor::{
    models::{
        bar_series::{BarSeries, normalize_ticker},
        request_params::BarsRequestParams,
    },
    providers::{DataProvider, ProviderError},
};
use tracing::{debug, info, instrument};

use crate::{
    clock::Clock,
    dates::lookback_window,
    store::{BarStore, StoreError},
};

/// Errors from [`RefreshOrchestrator::ensure_history`].
#[derive(thiserror::Error, Debug)]
pub enum RefreshError {
    /// Lookback must cover at least one year and stay inside the calendar.
    #[error("invalid lookback of {0} years")]
    InvalidLookback(u32),

    /// The provider answered with zero usable bars.
    #[error("No data found for ticker: {ticker}")]
    NoDataAvailable {
        /// Uppercase ticker.
        ticker: String,
    },

    /// Passed through from the provider unchanged.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Decides per ticker whether stored bars can be served or must be refetched.
#[derive(Clone)]
pub struct RefreshOrchestrator {
    store: Arc<dyn BarStore>,
    provider: Arc<dyn DataProvider>,
    clock: Arc<dyn Clock>,
}

impl RefreshOrchestrator {
    /// Builds an orchestrator over the given store, provider and clock.
    pub fn new(store: Arc<dyn BarStore>, provider: Arc<dyn DataProvider>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            provider,
            clock,
        }
    }

    /// The store this orchestrator reads and writes.
    pub fn store(&self) -> &Arc<dyn BarStore> {
        &self.store
    }

    /// The current date according to the injected clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Returns the bars for the last `lookback_years * 365` days ending today.
    ///
    /// A ticker refreshed today is answered from the store without a remote call, as
    /// long as the store holds at least one bar in the window. Anything else triggers a
    /// single fetch whose result is persisted together with today's marker and then
    /// returned as received.
    #[instrument(skip(self))]
    pub async fn ensure_history(&self, ticker: &str, lookback_years: u32) -> Result<BarSeries, RefreshError> {
        if lookback_years == 0 {
            return Err(RefreshError::InvalidLookback(lookback_years));
        }
        let ticker = normalize_ticker(ticker);
        let today = self.clock.today();
        let (start, end) =
            lookback_window(today, lookback_years).ok_or(RefreshError::InvalidLookback(lookback_years))?;

        let refreshed = self.store.get_freshness(&ticker)?;
        let fresh = refreshed.is_some_and(|day| day >= today);

        if fresh {
            let cached = self.store.read_range(&ticker, start, end)?;
            if !cached.is_empty() {
                info!(%ticker, bars = cached.len(), "serving cached bars");
                return Ok(cached);
            }
            debug!(%ticker, "fresh marker but no bars in window");
        } else {
            info!(%ticker, last_refresh = ?refreshed, "cache stale, fetching");
        }

        let series = self
            .provider
            .fetch_bars(BarsRequestParams::new(&ticker, start, end))
            .await?;
        if series.is_empty() {
            return Err(RefreshError::NoDataAvailable { ticker });
        }

        self.store.record_refresh(&ticker, &series.bars, today)?;
        info!(%ticker, bars = series.len(), %start, %end, "persisted fetched bars");
        Ok(series)
    }
}
