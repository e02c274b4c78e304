use axum::{Json, http::StatusCode, response::IntoResponse};
use strava_schema::RelayErrorBody;
use thiserror::Error as ThisError;

use crate::upstream::TransportError;

/// Required inbound input that was not supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    AuthorizationCode,
    RefreshToken,
    AccessToken,
}

impl MissingInput {
    pub fn status(self) -> StatusCode {
        match self {
            MissingInput::AuthorizationCode | MissingInput::RefreshToken => {
                StatusCode::BAD_REQUEST
            }
            MissingInput::AccessToken => StatusCode::UNAUTHORIZED,
        }
    }
}

impl std::fmt::Display for MissingInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            MissingInput::AuthorizationCode => "No authorization code provided",
            MissingInput::RefreshToken => "No refresh token provided",
            MissingInput::AccessToken => "No access token provided",
        };
        f.write_str(msg)
    }
}

/// Errors surfaced to the browser. Messages are already scrubbed of secrets.
#[derive(Debug, ThisError)]
pub enum RelayError {
    #[error("{0}")]
    MissingInput(MissingInput),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to reach Strava during {operation}: {cause}")]
    NetworkFailure {
        operation: &'static str,
        cause: TransportError,
    },

    #[error("Strava API error: {} - {message}", status.as_u16())]
    UpstreamServerError { status: StatusCode, message: String },

    #[error("Strava API error: {} - {message}", status.as_u16())]
    UpstreamClientError { status: StatusCode, message: String },

    /// Upstream answered with something that is not JSON. `status` is what we surface.
    #[error("{message}")]
    UpstreamMalformedResponse { status: StatusCode, message: String },
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingInput(missing) => missing.status(),
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::NetworkFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::UpstreamServerError { status, .. }
            | RelayError::UpstreamClientError { status, .. }
            | RelayError::UpstreamMalformedResponse { status, .. } => *status,
        }
    }
}

impl From<MissingInput> for RelayError {
    fn from(missing: MissingInput) -> Self {
        RelayError::MissingInput(missing)
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = RelayErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
