use axum::{
    body::Bytes,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::de::IgnoredAny;
use serde_json::Value;
use strava_schema::StravaErrorBody;
use tracing::error;

use crate::error::RelayError;
use crate::upstream::UpstreamOutcome;
use crate::utils::redact::{Redactor, truncate_chars};

pub const UPSTREAM_ERROR_PREVIEW_CHARS: usize = 500;

/// Upstream JSON body relayed byte-for-byte.
#[derive(Debug, Clone)]
pub struct ForwardedJson {
    pub status: StatusCode,
    pub body: Bytes,
}

impl ForwardedJson {
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

impl IntoResponse for ForwardedJson {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

/// Turns the final outcome of a retried call into what the browser gets.
pub fn interpret_outcome(
    operation: &'static str,
    outcome: UpstreamOutcome,
    redactor: &Redactor<'_>,
) -> Result<ForwardedJson, RelayError> {
    match outcome {
        UpstreamOutcome::Success(status, body) => {
            if serde_json::from_slice::<IgnoredAny>(&body).is_ok() {
                return Ok(ForwardedJson { status, body });
            }
            let preview = preview(&body, redactor);
            error!(
                operation,
                status = status.as_u16(),
                body = %preview,
                "[Strava] non-JSON success payload"
            );
            Err(RelayError::UpstreamMalformedResponse {
                status: StatusCode::BAD_GATEWAY,
                message: format!(
                    "Strava returned a non-JSON response ({}): {preview}",
                    status.as_u16()
                ),
            })
        }
        UpstreamOutcome::ClientError(status, body) | UpstreamOutcome::ServerError(status, body) => {
            let err = error_from_body(status, &body, redactor);
            error!(operation, status = status.as_u16(), error = %err, "[Strava] upstream error");
            Err(err)
        }
        UpstreamOutcome::NetworkFailure(cause) => {
            error!(operation, error = %cause, "[Strava] upstream unreachable");
            Err(RelayError::NetworkFailure { operation, cause })
        }
    }
}

fn error_from_body(status: StatusCode, body: &[u8], redactor: &Redactor<'_>) -> RelayError {
    let detail = if let Ok(parsed) = serde_json::from_slice::<StravaErrorBody>(body) {
        parsed.detail()
    } else if let Ok(value) = serde_json::from_slice::<Value>(body) {
        value.to_string()
    } else {
        return RelayError::UpstreamMalformedResponse {
            status,
            message: format!(
                "Strava API error: {} - {}",
                status.as_u16(),
                preview(body, redactor)
            ),
        };
    };

    let message = truncate_chars(&redactor.scrub(&detail), UPSTREAM_ERROR_PREVIEW_CHARS);
    if status.is_server_error() {
        RelayError::UpstreamServerError { status, message }
    } else {
        RelayError::UpstreamClientError { status, message }
    }
}

fn preview(body: &[u8], redactor: &Redactor<'_>) -> String {
    let raw = String::from_utf8_lossy(body);
    truncate_chars(&redactor.scrub(&raw), UPSTREAM_ERROR_PREVIEW_CHARS)
}
