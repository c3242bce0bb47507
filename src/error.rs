use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Chrono(#[from] chrono::ParseError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }
}

/// Failure attached to a single symbol (or, for quotes, a single chunk).
///
/// Per-symbol strategies never surface these as an operation error; they are
/// stored on the symbol's [`FetchResult`](crate::fetch::FetchResult) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid interval `{0}`")]
    InvalidInterval(String),
    #[error("invalid time range: end {end} precedes start {start}")]
    InvalidDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("invalid quote param `{0}`")]
    InvalidQuoteParam(String),
    #[error("at least one quote param is required")]
    EmptyQuoteParams,
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
    #[error("request error 401")]
    Unauthorized,
    #[error("request error 404")]
    NotFound,
    #[error("request error {0}")]
    Status(u16),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("worker exited without reporting a result")]
    WorkerLost,
}

impl FetchError {
    pub fn malformed<T: Into<String>>(detail: T) -> Self {
        FetchError::MalformedResponse(detail.into())
    }

    /// True for failures detected before any network access.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FetchError::InvalidInterval(_)
                | FetchError::InvalidDateRange { .. }
                | FetchError::InvalidQuoteParam(_)
                | FetchError::EmptyQuoteParams
        )
    }

    /// Classify an HTTP status. Returns `None` for any 2xx.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            401 => Some(FetchError::Unauthorized),
            404 => Some(FetchError::NotFound),
            other => Some(FetchError::Status(other)),
        }
    }
}
