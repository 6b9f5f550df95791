//! Service errors and their caller-facing classification.

use price_cache::{refresh::RefreshError, store::StoreError};
use price_ingestor::providers::{ProviderError, ProviderInitError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vol_analytics::AnalyticsError;

/// How a failure is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Nothing to analyze for the ticker.
    NotFound,
    /// The request itself is unusable.
    BadRequest,
    /// Anything else.
    Internal,
}

impl ErrorClass {
    /// Equivalent HTTP status.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorClass::NotFound => 404,
            ErrorClass::BadRequest => 400,
            ErrorClass::Internal => 500,
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("ticker must not be empty")]
    EmptyTicker,

    #[error(transparent)]
    Refresh(#[from] RefreshError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    ProviderInit(#[from] ProviderInitError),
}

impl ServiceError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ServiceError::EmptyTicker => ErrorClass::BadRequest,
            ServiceError::Analytics(AnalyticsError::InsufficientHistory { .. }) => ErrorClass::NotFound,
            ServiceError::Refresh(err) => match err {
                RefreshError::NoDataAvailable { .. } => ErrorClass::NotFound,
                RefreshError::InvalidLookback(_) => ErrorClass::BadRequest,
                RefreshError::Provider(p) if p.is_missing_data() => ErrorClass::NotFound,
                RefreshError::Provider(_) | RefreshError::Store(_) => ErrorClass::Internal,
            },
            ServiceError::Store(_) | ServiceError::ProviderInit(_) => ErrorClass::Internal,
        }
    }

    /// Message shown to the caller. Internal failures carry the
    /// `Error calculating volatility: ` prefix.
    pub fn detail(&self) -> String {
        match self.class() {
            ErrorClass::Internal => format!("Error calculating volatility: {self}"),
            _ => self.to_string(),
        }
    }

    /// The provider error underneath, if any.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            ServiceError::Refresh(RefreshError::Provider(p)) => Some(p),
            _ => None,
        }
    }
}

/// Serialized error payload, `{"detail": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl From<&ServiceError> for ErrorBody {
    fn from(err: &ServiceError) -> Self {
        Self {
            detail: err.detail(),
        }
    }
}
