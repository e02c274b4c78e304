use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use oauth2::AccessToken;
use std::convert::Infallible;

/// Access token the browser forwards for Strava, if any.
///
/// Accepts `Authorization: Bearer <token>` and, like the browser client historically sent,
/// a bare token in the `Authorization` header.
#[derive(Debug, Clone)]
pub struct ForwardedBearer(pub Option<AccessToken>);

fn extract_token(headers: &axum::http::HeaderMap) -> Option<String> {
    if let Some(auth) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(auth.token().to_string());
    }
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|raw| raw.strip_prefix("Bearer ").unwrap_or(raw).trim())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for ForwardedBearer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ForwardedBearer(
            extract_token(&parts.headers).map(AccessToken::new),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn bearer_scheme_is_stripped() {
        assert_eq!(extract_token(&headers("Bearer at-1")).as_deref(), Some("at-1"));
    }

    #[test]
    fn bare_token_is_accepted() {
        assert_eq!(extract_token(&headers("at-2")).as_deref(), Some("at-2"));
    }

    #[test]
    fn empty_or_absent_header_yields_none() {
        assert_eq!(extract_token(&headers("Bearer ")), None);
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }
}
