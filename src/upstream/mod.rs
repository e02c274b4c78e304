//! Retrying client for outbound calls to the upstream API.
//!
//! A call runs as a small state machine: `Attempting` sends the request once, the outcome is
//! fed to [`RetryPolicy::advance`], which yields either `Retrying` (sleep, then attempt again)
//! or `Terminal`. Network failures and 5xx responses are retryable, everything else is final.

mod client;
mod outcome;
mod policy;
mod request;
mod transport;

pub use client::RetryingClient;
pub use outcome::{TransportError, UpstreamOutcome, UpstreamResponse};
pub use policy::{RetryPolicy, RetryState};
pub use request::UpstreamRequest;
pub use transport::{ReqwestTransport, Sleeper, TokioSleeper, Transport};
