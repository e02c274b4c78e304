use super::parse_json_body;
use crate::error::RelayError;
use crate::server::router::RelayState;
use crate::strava::ForwardedJson;
use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
};
use strava_schema::{AuthUrlQuery, AuthUrlResponse, ExchangeTokenRequest, RefreshTokenRequest};
use tracing::info;

/// GET /api/auth-url
///
/// Builds the Strava authorization URL; the browser navigates there itself.
pub async fn auth_url_handler(
    State(state): State<RelayState>,
    Query(query): Query<AuthUrlQuery>,
) -> Result<Json<AuthUrlResponse>, RelayError> {
    let url = state
        .strava
        .api()
        .authorize_url(query.redirect_uri.as_deref(), query.scopes.as_deref())
        .map_err(|e| RelayError::InvalidRequest(format!("redirect_uri: {e}")))?;

    info!(
        redirect_uri = query.redirect_uri.as_deref().unwrap_or("<default>"),
        "Generated Strava auth URL"
    );
    Ok(Json(AuthUrlResponse {
        url: url.to_string(),
    }))
}

/// POST /api/exchange-token
pub async fn exchange_token_handler(
    State(state): State<RelayState>,
    body: Bytes,
) -> Result<ForwardedJson, RelayError> {
    let req: ExchangeTokenRequest = parse_json_body(&body)?;
    state.strava.exchange_token(req.code.as_deref()).await
}

/// POST /api/refresh-token
pub async fn refresh_token_handler(
    State(state): State<RelayState>,
    body: Bytes,
) -> Result<ForwardedJson, RelayError> {
    let req: RefreshTokenRequest = parse_json_body(&body)?;
    state.strava.refresh_token(req.refresh_token.as_deref()).await
}
