mod basic;
mod retry;
mod strava;

pub use basic::BasicConfig;
pub use retry::{ActivitiesConfig, RetryConfig};
pub use strava::StravaConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Strava credentials and endpoints (see `strava` table in config.toml).
    #[serde(default)]
    pub strava: StravaConfig,

    /// Upstream retry budgets (see `retry` table in config.toml).
    #[serde(default)]
    pub retry: RetryConfig,

    /// Activities default filter (see `activities` table in config.toml).
    #[serde(default)]
    pub activities: ActivitiesConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Env vars understood for compatibility with plain `.env` deployments.
const LEGACY_ENV_KEYS: [&str; 3] = ["STRAVA_CLIENT_ID", "STRAVA_CLIENT_SECRET", "PORT"];

impl Config {
    /// Builds a Figment that merges defaults, `config.toml` if present, and the environment.
    pub fn figment() -> Figment {
        Self::figment_at(DEFAULT_CONFIG_FILE)
    }

    /// Same as [`Config::figment`] with an explicit config file path.
    ///
    /// Precedence (last wins): defaults, TOML file, legacy env vars, `RELAY_` env vars.
    /// Nested keys use `__`, e.g. `RELAY_RETRY__DATA_MAX_ATTEMPTS=5`.
    pub fn figment_at(path: impl AsRef<Path>) -> Figment {
        let path = path.as_ref();
        let mut figment = Self::defaults();
        if path.is_file() {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::raw().only(&LEGACY_ENV_KEYS).map(|key| {
                match key.as_str().to_ascii_uppercase().as_str() {
                    "STRAVA_CLIENT_ID" => "strava.client_id".into(),
                    "STRAVA_CLIENT_SECRET" => "strava.client_secret".into(),
                    "PORT" => "basic.listen_port".into(),
                    _ => key.into(),
                }
            }))
            .merge(Env::prefixed("RELAY_").split("__"))
    }

    /// Figment holding only the serde defaults.
    pub fn defaults() -> Figment {
        Figment::new().merge(Serialized::defaults(Config::default()))
    }

    /// Loads configuration from defaults, `config.toml` and the environment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}
