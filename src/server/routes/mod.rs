use crate::error::RelayError;
use crate::server::router::RelayState;
use axum::{
    Router,
    body::Bytes,
    routing::{get, post},
};
use serde::de::DeserializeOwned;

pub mod athlete;
pub mod auth;
pub mod meta;

pub fn router() -> Router<RelayState> {
    Router::new()
        .route("/auth-url", get(auth::auth_url_handler))
        .route("/exchange-token", post(auth::exchange_token_handler))
        .route("/refresh-token", post(auth::refresh_token_handler))
        .route("/activities", get(athlete::activities_handler))
        .route("/athlete/zones", get(athlete::zones_handler))
        .route("/debug-info", get(meta::debug_info_handler))
        .route("/health", get(meta::health_handler))
}

/// Parses an optional JSON body. An empty body is the default value, so a missing field
/// surfaces as missing input rather than a parse error.
pub(crate) fn parse_json_body<T>(body: &Bytes) -> Result<T, RelayError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| RelayError::InvalidRequest(e.to_string()))
}
