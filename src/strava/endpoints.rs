use oauth2::{AuthUrl, TokenUrl};
use url::Url;

use crate::config::StravaConfig;

const ACTIVITIES_PATH: &str = "athlete/activities";
const ZONES_PATH: &str = "athlete/zones";

/// Resolved upstream endpoints.
#[derive(Debug, Clone)]
pub struct StravaEndpoints {
    pub authorize: AuthUrl,
    pub token: TokenUrl,
    pub activities: Url,
    pub zones: Url,
}

impl StravaEndpoints {
    pub fn from_config(cfg: &StravaConfig) -> Result<Self, url::ParseError> {
        let mut base = cfg.api_base_url.clone();
        // `Url::join` drops the last segment unless the base ends with '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            authorize: AuthUrl::from_url(cfg.authorize_url.clone()),
            token: TokenUrl::from_url(cfg.token_url.clone()),
            activities: base.join(ACTIVITIES_PATH)?,
            zones: base.join(ZONES_PATH)?,
        })
    }
}
