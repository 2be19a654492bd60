use std::fmt;

use crate::traits::TransportError;

/// Result type for tablewire-connectors operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the connector layer
#[derive(Debug)]
pub enum Error {
    /// The host transport failed or the service answered with an error
    Api {
        status: Option<u16>,
        message: String,
    },

    /// A response or request body did not match the expected JSON shape
    Json(serde_json::Error),

    /// Subscription state missing or unusable
    State(String),

    /// Caller-supplied parameters rejected before any API call
    Invalid(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Api {
                status: Some(status),
                message,
            } => write!(f, "API error ({}): {}", status, message),
            Error::Api {
                status: None,
                message,
            } => write!(f, "API error: {}", message),
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::State(msg) => write!(f, "State error: {}", msg),
            Error::Invalid(msg) => write!(f, "Invalid parameters: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json(err) => Some(err),
            Error::Api { .. } | Error::State(_) | Error::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Error::Api {
            status: err.status,
            message: err.message,
        }
    }
}
