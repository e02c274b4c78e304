use axum::body::Bytes;
use reqwest::StatusCode;
use std::error::Error as _;
use thiserror::Error as ThisError;

use crate::error::IsRetryable;

/// Raw upstream response of one attempt.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Failure to get any response out of one attempt.
///
/// Messages never carry the request URL (which may hold query filters) nor headers.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid request: {0}")]
    Build(String),
}

impl IsRetryable for TransportError {
    fn is_retryable(&self) -> bool {
        !matches!(self, TransportError::Build(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        let message = error_chain(&err);
        if err.is_builder() {
            TransportError::Build(message)
        } else if err.is_timeout() {
            TransportError::Timeout(message)
        } else if err.is_connect() {
            TransportError::Connect(message)
        } else {
            TransportError::Request(message)
        }
    }
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Final (or intermediate) classification of an upstream call.
#[derive(Debug, Clone)]
pub enum UpstreamOutcome {
    /// 2xx, plus 1xx/3xx passed through for the caller to decide.
    Success(StatusCode, Bytes),
    /// 4xx. Never retried.
    ClientError(StatusCode, Bytes),
    /// 5xx. Retried until the budget runs out.
    ServerError(StatusCode, Bytes),
    /// No response at all. Retried unless the request could not even be built.
    NetworkFailure(TransportError),
}

impl UpstreamOutcome {
    pub fn classify(response: UpstreamResponse) -> Self {
        let UpstreamResponse { status, body } = response;
        if status.is_server_error() {
            UpstreamOutcome::ServerError(status, body)
        } else if status.is_client_error() {
            UpstreamOutcome::ClientError(status, body)
        } else {
            UpstreamOutcome::Success(status, body)
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamOutcome::Success(status, _)
            | UpstreamOutcome::ClientError(status, _)
            | UpstreamOutcome::ServerError(status, _) => Some(*status),
            UpstreamOutcome::NetworkFailure(_) => None,
        }
    }

    pub fn body(&self) -> Option<&Bytes> {
        match self {
            UpstreamOutcome::Success(_, body)
            | UpstreamOutcome::ClientError(_, body)
            | UpstreamOutcome::ServerError(_, body) => Some(body),
            UpstreamOutcome::NetworkFailure(_) => None,
        }
    }

    /// Short description for logs; never includes the body.
    pub fn summary(&self) -> String {
        match self {
            UpstreamOutcome::NetworkFailure(err) => format!("network failure ({err})"),
            other => match other.status() {
                Some(status) => format!("status {}", status.as_u16()),
                None => "unknown".to_string(),
            },
        }
    }
}

impl IsRetryable for UpstreamOutcome {
    fn is_retryable(&self) -> bool {
        match self {
            UpstreamOutcome::ServerError(..) => true,
            UpstreamOutcome::NetworkFailure(err) => err.is_retryable(),
            UpstreamOutcome::Success(..) | UpstreamOutcome::ClientError(..) => false,
        }
    }
}

impl From<Result<UpstreamResponse, TransportError>> for UpstreamOutcome {
    fn from(result: Result<UpstreamResponse, TransportError>) -> Self {
        match result {
            Ok(response) => UpstreamOutcome::classify(response),
            Err(err) => UpstreamOutcome::NetworkFailure(err),
        }
    }
}
