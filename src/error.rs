use thiserror::Error;

use crate::targets::Target;

/// Why fetching a single target failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request error: {0}")]
    Request(String),
    #[error("timed out")]
    Timeout,
    #[error("status code error: {0}")]
    Status(u16),
    #[error("body error: {0}")]
    Body(String),
    #[error("task error: {0}")]
    Task(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        if let Some(status) = err.status() {
            return Self::Status(status.as_u16());
        }
        if err.is_body() || err.is_decode() {
            return Self::Body(err.to_string());
        }
        Self::Request(err.to_string())
    }
}

impl From<tokio::task::JoinError> for FetchError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

/// A run aborted under [`FailurePolicy::FailFast`](crate::config::FailurePolicy).
#[derive(Debug, Error)]
#[error("target {index} ({target}) failed: {source}")]
pub struct RunError {
    pub index: usize,
    pub target: Target,
    pub source: FetchError,
}
