pub mod relay;
pub mod strava;

pub use relay::{
    AuthUrlQuery, AuthUrlResponse, DebugInfo, ExchangeTokenRequest, RefreshTokenRequest,
    RelayErrorBody,
};
pub use strava::{StravaErrorBody, TokenGrant};
