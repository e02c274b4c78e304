use crate::server::router::RelayState;
use axum::{Json, extract::State};
use serde_json::{Value, json};
use std::time::{SystemTime, UNIX_EPOCH};
use strava_schema::DebugInfo;

/// GET /api/debug-info
///
/// Configuration sanity check for deployments; never includes the client secret.
pub async fn debug_info_handler(State(state): State<RelayState>) -> Json<DebugInfo> {
    let api = state.strava.api();
    let server_time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default();

    Json(DebugInfo {
        strava_client_id: api.client_id().as_str().to_owned(),
        expected_redirect_uri: api.redirect_uri().to_string(),
        server_time,
    })
}

/// GET /api/health
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
