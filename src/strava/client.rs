use chrono::Utc;
use oauth2::AccessToken;
use strava_schema::TokenGrant;
use tracing::{debug, info};

use super::{ActivityWindow, ForwardedJson, StravaApi, interpret_outcome};
use crate::config::{ActivitiesConfig, RetryConfig};
use crate::error::{MissingInput, RelayError};
use crate::upstream::{RetryPolicy, RetryingClient};
use crate::utils::logging::with_redacted_json_info;

/// The four upstream operations, each run under its retry budget.
#[derive(Clone)]
pub struct StravaClient {
    api: StravaApi,
    upstream: RetryingClient,
    token_policy: RetryPolicy,
    data_policy: RetryPolicy,
    window: Option<ActivityWindow>,
}

impl StravaClient {
    pub fn new(
        api: StravaApi,
        upstream: RetryingClient,
        retry: &RetryConfig,
        activities: &ActivitiesConfig,
    ) -> Self {
        Self {
            api,
            upstream,
            token_policy: retry.token_policy(),
            data_policy: retry.data_policy(),
            window: activities.default_window_weeks.and_then(ActivityWindow::new),
        }
    }

    pub fn api(&self) -> &StravaApi {
        &self.api
    }

    pub fn window(&self) -> Option<ActivityWindow> {
        self.window
    }

    /// Exchanges an authorization code for tokens.
    pub async fn exchange_token(&self, code: Option<&str>) -> Result<ForwardedJson, RelayError> {
        let code = non_blank(code).ok_or(MissingInput::AuthorizationCode)?;
        let grant = TokenGrant::AuthorizationCode {
            code: code.to_string(),
        };

        let fwd = self.run_token_grant(&grant, code).await?;
        if let Ok(payload) = fwd.json() {
            with_redacted_json_info(&payload, |redacted| {
                info!(payload = %redacted, "[Strava] Token exchange successful");
            });
        }
        Ok(fwd)
    }

    pub async fn refresh_token(
        &self,
        refresh_token: Option<&str>,
    ) -> Result<ForwardedJson, RelayError> {
        let refresh_token = non_blank(refresh_token).ok_or(MissingInput::RefreshToken)?;
        let grant = TokenGrant::RefreshToken {
            refresh_token: refresh_token.to_string(),
        };

        let fwd = self.run_token_grant(&grant, refresh_token).await?;
        info!("[Strava] Token refresh successful");
        Ok(fwd)
    }

    pub async fn activities(
        &self,
        token: Option<&AccessToken>,
        mut query: Vec<(String, String)>,
    ) -> Result<ForwardedJson, RelayError> {
        let token = token
            .filter(|t| !t.secret().trim().is_empty())
            .ok_or(MissingInput::AccessToken)?;
        if let Some(window) = self.window {
            window.apply(&mut query, Utc::now());
        }

        let request = self.api.activities_request(token, query);
        debug!(request = ?request, "[Strava] Fetching activities");
        let outcome = self.upstream.execute(&request, &self.data_policy).await;
        let redactor = self.api.redactor().secret(token.secret());
        interpret_outcome(request.operation(), outcome, &redactor)
    }

    pub async fn zones(&self, token: Option<&AccessToken>) -> Result<ForwardedJson, RelayError> {
        let token = token
            .filter(|t| !t.secret().trim().is_empty())
            .ok_or(MissingInput::AccessToken)?;

        let request = self.api.zones_request(token);
        debug!(request = ?request, "[Strava] Fetching athlete zones");
        let outcome = self.upstream.execute(&request, &self.data_policy).await;
        let redactor = self.api.redactor().secret(token.secret());
        interpret_outcome(request.operation(), outcome, &redactor)
    }

    async fn run_token_grant(
        &self,
        grant: &TokenGrant,
        grant_secret: &str,
    ) -> Result<ForwardedJson, RelayError> {
        let request = self.api.token_request(grant);
        info!(
            operation = request.operation(),
            grant_type = grant.grant_type(),
            max_attempts = self.token_policy.max_attempts(),
            "[Strava] Calling token endpoint"
        );
        let outcome = self.upstream.execute(&request, &self.token_policy).await;
        let redactor = self.api.redactor().secret(grant_secret);
        interpret_outcome(request.operation(), outcome, &redactor)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
