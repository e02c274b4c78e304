use oauth2::{AccessToken, ClientId, ClientSecret, RedirectUrl};
use std::time::Duration;
use strava_schema::TokenGrant;
use url::Url;

use super::StravaEndpoints;
use crate::config::StravaConfig;
use crate::upstream::UpstreamRequest;
use crate::utils::redact::Redactor;

/// Builds upstream requests for the Strava API. Holds the client credentials.
#[derive(Debug, Clone)]
pub struct StravaApi {
    client_id: ClientId,
    client_secret: ClientSecret,
    redirect_uri: String,
    default_scopes: String,
    endpoints: StravaEndpoints,
    token_timeout: Duration,
    data_timeout: Duration,
}

impl StravaApi {
    pub fn from_config(cfg: &StravaConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            client_id: ClientId::new(cfg.client_id.clone()),
            client_secret: ClientSecret::new(cfg.client_secret.clone()),
            redirect_uri: cfg.redirect_uri.clone(),
            default_scopes: cfg.scopes.clone(),
            endpoints: StravaEndpoints::from_config(cfg)?,
            token_timeout: cfg.token_timeout(),
            data_timeout: cfg.data_timeout(),
        })
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn endpoints(&self) -> &StravaEndpoints {
        &self.endpoints
    }

    /// Authorization page URL the browser is sent to.
    ///
    /// Strava expects comma separated scopes and no PKCE/state, so this is assembled by hand
    /// rather than through an OAuth2 authorization request.
    pub fn authorize_url(
        &self,
        redirect_uri: Option<&str>,
        scopes: Option<&str>,
    ) -> Result<Url, url::ParseError> {
        let redirect_uri = RedirectUrl::new(
            redirect_uri
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(&self.redirect_uri)
                .to_string(),
        )?;
        let scopes = scopes
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.default_scopes);

        let mut url = self.endpoints.authorize.url().clone();
        url.query_pairs_mut()
            .append_pair("client_id", self.client_id.as_str())
            .append_pair("redirect_uri", redirect_uri.as_str())
            .append_pair("response_type", "code")
            .append_pair("scope", scopes);
        Ok(url)
    }

    /// POST to the token endpoint for either grant.
    pub fn token_request(&self, grant: &TokenGrant) -> UpstreamRequest {
        let credentials = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.secret().as_str()),
        ];
        let operation = match grant {
            TokenGrant::AuthorizationCode { .. } => "token_exchange",
            TokenGrant::RefreshToken { .. } => "token_refresh",
        };

        UpstreamRequest::post_form(
            operation,
            self.endpoints.token.url().clone(),
            credentials.into_iter().chain(grant.form_fields()),
        )
        .with_timeout(self.token_timeout)
    }

    pub fn activities_request(
        &self,
        token: &AccessToken,
        query: Vec<(String, String)>,
    ) -> UpstreamRequest {
        UpstreamRequest::get("activities", self.endpoints.activities.clone())
            .with_bearer(token.clone())
            .with_query(query)
            .with_timeout(self.data_timeout)
    }

    pub fn zones_request(&self, token: &AccessToken) -> UpstreamRequest {
        UpstreamRequest::get("zones", self.endpoints.zones.clone())
            .with_bearer(token.clone())
            .with_timeout(self.data_timeout)
    }

    /// Redactor preloaded with the client secret.
    pub fn redactor(&self) -> Redactor<'_> {
        Redactor::new().secret(self.client_secret.secret())
    }
}
