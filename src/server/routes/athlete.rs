use crate::error::RelayError;
use crate::server::guards::bearer::ForwardedBearer;
use crate::server::router::RelayState;
use crate::strava::ForwardedJson;
use axum::extract::{RawQuery, State};

/// GET /api/activities
///
/// Every query parameter is forwarded as-is.
pub async fn activities_handler(
    State(state): State<RelayState>,
    ForwardedBearer(token): ForwardedBearer,
    RawQuery(query): RawQuery,
) -> Result<ForwardedJson, RelayError> {
    let query: Vec<(String, String)> = query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();

    state.strava.activities(token.as_ref(), query).await
}

/// GET /api/athlete/zones
pub async fn zones_handler(
    State(state): State<RelayState>,
    ForwardedBearer(token): ForwardedBearer,
) -> Result<ForwardedJson, RelayError> {
    state.strava.zones(token.as_ref()).await
}
