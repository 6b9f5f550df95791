//! Provider abstraction for daily price history sources.
//!
//! This module defines the [`DataProvider`] trait, the single seam through which the
//! price cache talks to a remote vendor. Each concrete provider translates a
//! [`BarsRequestParams`] window into one vendor call and normalizes the response into a
//! [`BarSeries`]. Providers never retry; a failed call surfaces as a [`ProviderError`].
//!
//! The trait is async and object safe, so callers hold providers as
//! `Arc<dyn DataProvider>` and tests can substitute in-process fakes.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use price_ingestor::models::{bar_series::BarSeries, request_params::BarsRequestParams};
//! use price_ingestor::providers::{DataProvider, ProviderError};
//!
//! struct EmptyProvider;
//!
//! #[async_trait]
//! impl DataProvider for EmptyProvider {
//!     async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, ProviderError> {
//!         Ok(BarSeries::empty(&params.ticker))
//!     }
//! }
//! ```

pub mod yahoo_chart;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{bar_series::BarSeries, request_params::BarsRequestParams};

/// Trait for fetching daily bars from a market data provider.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches the bars the provider holds for `params.ticker` inside
    /// `[params.start, params.end]`.
    ///
    /// # Returns
    ///
    /// * `Ok(BarSeries)` - Date-ascending bars; possibly empty when the provider
    ///   answered but every row was unusable.
    /// * `Err(ProviderError)` - Transport failure or a response that names no data.
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// Transport failure or a non-success HTTP status.
    #[snafu(display("Price provider unavailable for {ticker}: {source}"))]
    ProviderUnavailable {
        ticker: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider answered but carried no result entry for the ticker.
    #[snafu(display("No data found for ticker: {ticker}"))]
    TickerNotFound { ticker: String, backtrace: Backtrace },

    /// The result entry exists but holds no timestamps or price points.
    #[snafu(display("No price data found for ticker: {ticker}"))]
    NoPriceData { ticker: String, backtrace: Backtrace },

    /// The body could not be decoded as a chart payload.
    #[snafu(display("Malformed provider response for {ticker}: {source}"))]
    MalformedResponse {
        ticker: String,
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}

impl ProviderError {
    /// True for the variants that mean "the provider has nothing for this ticker",
    /// as opposed to the provider being broken.
    pub fn is_missing_data(&self) -> bool {
        matches!(
            self,
            ProviderError::TickerNotFound { .. } | ProviderError::NoPriceData { .. }
        )
    }
}
