use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Strava application credentials and upstream endpoints.
#[derive(Clone, Deserialize, Serialize)]
pub struct StravaConfig {
    /// OAuth client id of the Strava application.
    /// TOML: `strava.client_id`. Env: `STRAVA_CLIENT_ID`.
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_string_lax")]
    pub client_id: String,

    /// OAuth client secret. Never leaves the server.
    /// TOML: `strava.client_secret`. Env: `STRAVA_CLIENT_SECRET`.
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_string_lax")]
    pub client_secret: String,

    /// Redirect URI registered with Strava; used when the caller does not pass one.
    /// TOML: `strava.redirect_uri`. Default: `http://localhost:3000/exchange_token`.
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// Comma separated scopes requested when the caller does not pass any.
    /// TOML: `strava.scopes`. Default: `read,activity:read_all,profile:read_all`.
    #[serde(default = "default_scopes")]
    pub scopes: String,

    /// TOML: `strava.authorize_url`. Default: `https://www.strava.com/oauth/authorize`.
    #[serde(default = "default_authorize_url")]
    pub authorize_url: Url,

    /// TOML: `strava.token_url`. Default: `https://www.strava.com/api/v3/oauth/token`.
    #[serde(default = "default_token_url")]
    pub token_url: Url,

    /// Base of the REST API; `athlete/activities` and `athlete/zones` are joined onto it.
    /// TOML: `strava.api_base_url`. Default: `https://www.strava.com/api/v3/`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: Url,

    /// Optional upstream HTTP proxy. If set, used for the reqwest client.
    /// TOML: `strava.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// Allow HTTP/2 multiplexing for the reqwest client; disabled forces HTTP/1.
    /// Both modes keep idle connections pooled across requests.
    /// TOML: `strava.enable_multiplexing`. Default: `false`.
    #[serde(default)]
    pub enable_multiplexing: bool,

    /// Per-attempt timeout of token endpoint calls.
    /// TOML: `strava.token_timeout_secs`. Default: `10`.
    #[serde(default = "default_token_timeout_secs")]
    pub token_timeout_secs: u64,

    /// Per-attempt timeout of activities/zones calls.
    /// TOML: `strava.data_timeout_secs`. Default: `30`.
    #[serde(default = "default_data_timeout_secs")]
    pub data_timeout_secs: u64,
}

impl StravaConfig {
    pub fn has_credentials(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }

    pub fn token_timeout(&self) -> Duration {
        Duration::from_secs(self.token_timeout_secs)
    }

    pub fn data_timeout(&self) -> Duration {
        Duration::from_secs(self.data_timeout_secs)
    }
}

impl Default for StravaConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
            scopes: default_scopes(),
            authorize_url: default_authorize_url(),
            token_url: default_token_url(),
            api_base_url: default_api_base_url(),
            proxy: None,
            enable_multiplexing: false,
            token_timeout_secs: default_token_timeout_secs(),
            data_timeout_secs: default_data_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for StravaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secret = (!self.client_secret.is_empty()).then_some("<redacted>");
        f.debug_struct("StravaConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &secret)
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("authorize_url", &self.authorize_url.as_str())
            .field("token_url", &self.token_url.as_str())
            .field("api_base_url", &self.api_base_url.as_str())
            .field("proxy", &self.proxy.as_ref().map(Url::as_str))
            .field("enable_multiplexing", &self.enable_multiplexing)
            .field("token_timeout_secs", &self.token_timeout_secs)
            .field("data_timeout_secs", &self.data_timeout_secs)
            .finish()
    }
}

// Strava client ids are numeric; accept both `12345` and `"12345"`.
fn deserialize_string_lax<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(serde::de::Error::custom(
            "expected a string or a number for a Strava credential",
        )),
    }
}

fn default_redirect_uri() -> String {
    "http://localhost:3000/exchange_token".to_string()
}

fn default_scopes() -> String {
    "read,activity:read_all,profile:read_all".to_string()
}

fn default_authorize_url() -> Url {
    Url::parse("https://www.strava.com/oauth/authorize").expect("valid Strava authorize URL")
}

fn default_token_url() -> Url {
    Url::parse("https://www.strava.com/api/v3/oauth/token").expect("valid Strava token URL")
}

fn default_api_base_url() -> Url {
    Url::parse("https://www.strava.com/api/v3/").expect("valid Strava API base URL")
}

fn default_token_timeout_secs() -> u64 {
    10
}

fn default_data_timeout_secs() -> u64 {
    30
}
