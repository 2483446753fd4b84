//! Error types shared by the fetch, cache and configuration layers.

use thiserror::Error;

/// Why a fetch did not produce data.
///
/// Stored by value inside published fetch state, so every variant carries
/// owned, cloneable descriptions instead of the underlying library errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("API returned status code {code} for {url}")]
    Status { code: u16, url: String },

    /// `path` is the field path inside the document, `.` for the root.
    #[error("Decoding error at `{path}`: {message}")]
    Decode { path: String, message: String },

    #[error("Invalid path segment {0:?}")]
    InvalidPath(String),

    #[error("Request was cancelled")]
    Cancelled,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode {
            path: ".".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for FetchError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        FetchError::Decode {
            path: err.path().to_string(),
            message: err.into_inner().to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return FetchError::Status {
                code: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            };
        }
        if err.is_decode() {
            return FetchError::Decode {
                path: ".".to_string(),
                message: err.to_string(),
            };
        }
        FetchError::Transport(err.to_string())
    }
}

impl From<mongodb::error::Error> for FetchError {
    fn from(err: mongodb::error::Error) -> Self {
        FetchError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::Storage(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("{0} must be set")]
    Missing(&'static str),
}
