//! Daily price bar ingestion.
//!
//! [`models`] holds the vendor-agnostic [`Bar`](models::bar::Bar) and
//! [`BarSeries`](models::bar_series::BarSeries) types, and [`providers`] defines the
//! [`DataProvider`](providers::DataProvider) trait with the Yahoo chart implementation.

pub mod models;
pub mod providers;
