//! Error type definitions
//!
//! Provides all possible error types in the outdial library.

/// Result type alias for outdial
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the outdial library
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request or schedule validation errors
    #[error("validation error: {0}")]
    Validation(String),

    /// The voice API rejected or failed the placement
    #[error("call placement failed: {detail}")]
    Placement {
        /// HTTP status returned by the voice API, when one was received
        status: Option<u16>,
        /// Upstream error detail (response body or timeout description)
        detail: String,
    },

    /// HTTP transport errors
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for a placement failure without an HTTP status
    pub fn placement(detail: impl Into<String>) -> Self {
        Error::Placement {
            status: None,
            detail: detail.into(),
        }
    }

    /// Check if the error is a validation error (the caller's input is at fault)
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Check if the error came from the placement path (API rejection or transport)
    pub fn is_placement(&self) -> bool {
        matches!(self, Error::Placement { .. } | Error::Http(_))
    }
}
