//! Database utilities for connections and schema migrations.
//!
//! This module provides:
//! - SQLite connection helpers: [`connection::connect_sqlite`] applies WAL, foreign_keys=ON, and a 5000ms busy_timeout.
//! - Embedded Diesel migrations and runners: [`migrate::run_pending`] on an open connection and
//!   [`migrate::run_sqlite`] for a database path or URL.
//!
//! Neither runs implicitly. The process entry point calls one of them once (usually through
//! [`BarStore::initialize`](crate::store::BarStore::initialize)) before serving requests.
//!
//! Example:
//! ```no_run
//! use price_cache::db::{connection, migrate};
//!
//! let db_path = std::env::temp_dir().join("price_cache_example.db");
//! migrate::run_sqlite(db_path.to_str().unwrap()).expect("migrations");
//!
//! let _conn = connection::connect_sqlite(db_path.to_str().unwrap()).expect("connect");
//! ```

pub mod connection;
pub mod migrate;
