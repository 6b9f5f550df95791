//! Caller-facing volatility service: configuration, error classification, and the
//! pipeline tying the price cache to the analytics engine.

pub mod config;
pub mod error;
pub mod service;

pub use config::AppConfig;
pub use error::{ErrorBody, ErrorClass, ServiceError};
pub use service::{HealthStatus, VolatilityService};
