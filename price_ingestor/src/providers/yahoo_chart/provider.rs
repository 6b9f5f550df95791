use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use snafu::ResultExt;
use tracing::{debug, instrument};

use crate::{
    models::{bar_series::BarSeries, request_params::BarsRequestParams},
    providers::{
        ClientBuildSnafu, DataProvider, MalformedResponseSnafu, ProviderError,
        ProviderInitError, ProviderUnavailableSnafu,
        yahoo_chart::{
            params::{chart_url, construct_params},
            response::ChartResponse,
        },
    },
};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// The chart endpoint rejects requests without a browser-like agent.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Connection settings for [`YahooChartProvider`].
#[derive(Debug, Clone)]
pub struct YahooChartConfig {
    /// Scheme and host of the chart API, without the `/v8/...` path.
    pub base_url: String,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Optional whole-request timeout. `None` leaves the call unbounded.
    pub timeout: Option<Duration>,
}

impl Default for YahooChartConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

pub struct YahooChartProvider {
    client: Client,
    base_url: String,
}

impl YahooChartProvider {
    /// Creates a provider against the public chart API.
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_config(YahooChartConfig::default())
    }

    /// Creates a provider from explicit settings (tests point `base_url` at a mock server).
    pub fn with_config(config: YahooChartConfig) -> Result<Self, ProviderInitError> {
        let mut builder = Client::builder().user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl DataProvider for YahooChartProvider {
    #[instrument(skip(self), fields(ticker = %params.ticker))]
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<BarSeries, ProviderError> {
        let ticker = params.ticker.as_str();
        let url = chart_url(&self.base_url, ticker);

        // One attempt per call; retry policy belongs to the caller.
        let body = self
            .client
            .get(&url)
            .query(&construct_params(&params))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .context(ProviderUnavailableSnafu { ticker })?
            .bytes()
            .await
            .context(ProviderUnavailableSnafu { ticker })?;

        let chart: ChartResponse =
            serde_json::from_slice(&body).context(MalformedResponseSnafu { ticker })?;

        let series = chart.into_bar_series(ticker)?;
        debug!(bars = series.len(), start = %params.start, end = %params.end, "chart fetch complete");
        Ok(series)
    }
}
