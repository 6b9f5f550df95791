//! Local cache of daily price bars and the logic deciding when to refresh it.
//!
//! - [`store`]: the [`store::BarStore`] trait and its SQLite implementation.
//! - [`refresh`]: [`refresh::RefreshOrchestrator`], which serves fresh bars from the store
//!   and otherwise fetches through a [`price_ingestor::providers::DataProvider`].
//! - [`db`]: connection and migration helpers.

#![deny(missing_docs)]

pub mod clock;
pub mod dates;
pub mod db;
pub mod models;
pub mod refresh;
#[allow(missing_docs)]
pub mod schema;
pub mod store;
