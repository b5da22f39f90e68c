use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur when talking to a helpdesk platform.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Non-2xx response from the platform.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The platform rejected the configured credentials.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Network or connection error.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The response body could not be decoded.
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Provider configuration is incomplete or inconsistent.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ProviderError {
    #[inline]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    #[inline]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    #[inline]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status of an API error, if any.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<HttpError> for ProviderError {
    fn from(err: HttpError) -> Self {
        Self::network(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}

/// Extract a short error message suitable for display.
///
/// Takes the first line of an error message. Remote API errors often embed a
/// full HTML error page, which is noise in an error log entry.
#[inline]
pub fn short_error_message(e: &impl std::error::Error) -> String {
    let full = e.to_string();
    full.lines().next().unwrap_or(&full).to_string()
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
