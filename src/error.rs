//! Error types for the gallery renderer

use thiserror::Error;

/// Result type alias for gallery operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside of the render pass itself.
///
/// Manifest failures during a render are not returned through this type;
/// they are reported as [`crate::RenderOutcome::LoadFailed`] and shown inline
/// in the page. `Error::Fetch` exists for callers that use a loader directly.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to build the HTTP client
    #[error("Loader initialization failed: {0}")]
    InitializationError(String),

    /// Failed to fetch or read the page being rendered
    #[error("Failed to load page: {0}")]
    LoadError(String),

    /// Manifest could not be fetched or parsed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Failure to obtain a usable manifest.
///
/// Every variant names the manifest URL so the inline diagnostic and the log
/// line point at the document that needs fixing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("Failed to fetch {url} ({status})")]
    Status { url: String, status: u16 },

    /// The request never produced a response
    #[error("Failed to fetch {url}: {reason}")]
    Transport { url: String, reason: String },

    /// The body was not valid JSON
    #[error("Failed to parse {url}: {reason}")]
    Parse { url: String, reason: String },
}

impl FetchError {
    /// URL of the manifest that failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Status { url, .. }
            | FetchError::Transport { url, .. }
            | FetchError::Parse { url, .. } => url,
        }
    }
}
