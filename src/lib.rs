pub mod config;
pub mod error;
pub mod server;
pub mod strava;
pub mod upstream;
pub mod utils;

pub use error::{MissingInput, RelayError};
