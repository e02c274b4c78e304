use serde::{Deserialize, Serialize};

/// Body of `POST /api/exchange-token`.
#[derive(Debug, Default, Deserialize)]
pub struct ExchangeTokenRequest {
    #[serde(default)]
    pub code: Option<String>,
}

/// Body of `POST /api/refresh-token`.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Query of `GET /api/auth-url`.
#[derive(Debug, Default, Deserialize)]
pub struct AuthUrlQuery {
    pub redirect_uri: Option<String>,
    pub scopes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthUrlResponse {
    pub url: String,
}

/// Non-sensitive view of the running configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct DebugInfo {
    pub strava_client_id: String,
    pub expected_redirect_uri: String,
    /// Seconds since the Unix epoch.
    pub server_time: f64,
}

/// Error envelope returned to the browser: `{"error": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RelayErrorBody {
    pub error: String,
}
