mod relay;

pub use relay::{MissingInput, RelayError};

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}
