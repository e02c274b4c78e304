use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Grant carried in the form body of a token endpoint call.
#[derive(Clone, PartialEq, Eq)]
pub enum TokenGrant {
    AuthorizationCode { code: String },
    RefreshToken { refresh_token: String },
}

impl TokenGrant {
    pub fn grant_type(&self) -> &'static str {
        match self {
            TokenGrant::AuthorizationCode { .. } => "authorization_code",
            TokenGrant::RefreshToken { .. } => "refresh_token",
        }
    }

    /// Form fields (besides the client credentials) sent to the token endpoint.
    pub fn form_fields(&self) -> [(&'static str, &str); 2] {
        match self {
            TokenGrant::AuthorizationCode { code } => {
                [("code", code.as_str()), ("grant_type", self.grant_type())]
            }
            TokenGrant::RefreshToken { refresh_token } => [
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", self.grant_type()),
            ],
        }
    }
}

impl std::fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGrant")
            .field("grant_type", &self.grant_type())
            .finish_non_exhaustive()
    }
}

/// Strava error payload. Upstream is loose about the shape: OAuth failures use `message`
/// plus an `errors` array, some gateways answer with a bare `error` string.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StravaErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,

    #[serde(flatten)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl StravaErrorBody {
    /// Human readable detail: `message`, else `error`, else the whole body as compact JSON.
    pub fn detail(&self) -> String {
        if let Some(message) = self.message.as_ref() {
            return value_to_text(message);
        }
        if let Some(error) = self.error.as_ref() {
            return value_to_text(error);
        }
        serde_json::to_string(self).unwrap_or_default()
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
