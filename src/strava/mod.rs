mod api;
mod client;
mod endpoints;
mod respond;
mod window;

pub use api::StravaApi;
pub use client::StravaClient;
pub use endpoints::StravaEndpoints;
pub use respond::{ForwardedJson, UPSTREAM_ERROR_PREVIEW_CHARS, interpret_outcome};
pub use window::ActivityWindow;
