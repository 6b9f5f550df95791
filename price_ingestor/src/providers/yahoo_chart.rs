//! Yahoo Finance v8 chart API provider.
//!
//! - [`params`]: request URL and query construction for a daily window.
//! - [`response`]: typed payload plus normalization into [`Bar`](crate::models::bar::Bar)s.
//! - [`provider`]: the [`DataProvider`](crate::providers::DataProvider) implementation.

pub mod params;
pub mod provider;
pub mod response;

pub use provider::{YahooChartConfig, YahooChartProvider};
