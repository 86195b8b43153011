//! Error types for the mock implementations.

use thiserror::Error;

/// Error type for the mock member directory.
#[derive(Debug, Error)]
pub enum Error {
    /// Returned when the directory was configured to fail.
    #[error("mock directory error: {0}")]
    MockError(String),
}

/// Error injected into mock admin requests.
#[derive(Debug, Error)]
#[error("injected failure: {0}")]
pub struct InjectedFailure(pub &'static str);
