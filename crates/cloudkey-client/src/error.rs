//! Client error types

use serde::Deserialize;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CloudKeyError>;

/// The closed set of server-reported failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The call needs credentials and the session is anonymous
    AuthorizationRequired,
    /// Bad credentials, or an impersonation target that is unknown or not permitted
    AuthenticationFailed,
    /// The referenced media or metadata key does not exist
    NotFound,
    /// A parameter failed the server's format check
    InvalidParam,
    /// A required parameter was omitted
    MissingParam,
}

impl ErrorKind {
    /// All kinds, in fault-code order
    pub const ALL: [ErrorKind; 5] = [
        Self::AuthenticationFailed,
        Self::AuthorizationRequired,
        Self::MissingParam,
        Self::InvalidParam,
        Self::NotFound,
    ];

    /// Map a server fault code to its kind
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            410 => Some(Self::AuthenticationFailed),
            420 => Some(Self::AuthorizationRequired),
            500 => Some(Self::MissingParam),
            510 => Some(Self::InvalidParam),
            600 => Some(Self::NotFound),
            _ => None,
        }
    }

    /// The server fault code for this kind
    pub fn code(&self) -> u32 {
        match self {
            Self::AuthenticationFailed => 410,
            Self::AuthorizationRequired => 420,
            Self::MissingParam => 500,
            Self::InvalidParam => 510,
            Self::NotFound => 600,
        }
    }

    /// Get the kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationRequired => "AuthorizationRequired",
            Self::AuthenticationFailed => "AuthenticationFailed",
            Self::NotFound => "NotFound",
            Self::InvalidParam => "InvalidParam",
            Self::MissingParam => "MissingParam",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client errors
#[derive(Error, Debug)]
pub enum CloudKeyError {
    /// Call requires authentication
    #[error("Authorization required: {0}")]
    AuthorizationRequired(String),

    /// Authentication or impersonation rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed parameter
    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    /// Missing parameter
    #[error("Missing parameter: {0}")]
    MissingParam(String),

    /// Server fault outside the documented taxonomy
    #[error("Server error ({code}): {message}")]
    Server { code: u32, message: String },

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid response
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error envelope returned by the API
#[derive(Debug, Deserialize)]
pub(crate) struct FaultEnvelope {
    pub error: Fault,
}

/// A server fault
#[derive(Debug, Deserialize)]
pub(crate) struct Fault {
    pub code: u32,
    #[serde(default)]
    pub message: String,
}

impl Fault {
    pub(crate) fn into_error(self) -> CloudKeyError {
        CloudKeyError::from_fault(self.code, self.message)
    }
}

impl CloudKeyError {
    /// Build the error for a server fault code
    pub fn from_fault(code: u32, message: impl Into<String>) -> Self {
        let message = message.into();
        match ErrorKind::from_code(code) {
            Some(kind) => Self::from_kind(kind, message),
            None => Self::Server { code, message },
        }
    }

    /// Build the error for a taxonomy kind
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::AuthorizationRequired => Self::AuthorizationRequired(message),
            ErrorKind::AuthenticationFailed => Self::AuthenticationFailed(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::InvalidParam => Self::InvalidParam(message),
            ErrorKind::MissingParam => Self::MissingParam(message),
        }
    }

    /// Parse an error out of a non-success HTTP response body
    pub fn from_http_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<FaultEnvelope>(body) {
            Ok(envelope) => envelope.error.into_error(),
            Err(_) => {
                let message = if body.trim().is_empty() {
                    "Unknown error".to_string()
                } else {
                    body.trim().to_string()
                };
                Self::Server {
                    code: u32::from(status),
                    message,
                }
            }
        }
    }

    /// The taxonomy kind, or `None` for unknown and transport errors
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::AuthorizationRequired(_) => Some(ErrorKind::AuthorizationRequired),
            Self::AuthenticationFailed(_) => Some(ErrorKind::AuthenticationFailed),
            Self::NotFound(_) => Some(ErrorKind::NotFound),
            Self::InvalidParam(_) => Some(ErrorKind::InvalidParam),
            Self::MissingParam(_) => Some(ErrorKind::MissingParam),
            _ => None,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is an "invalid parameter" error
    pub fn is_invalid_param(&self) -> bool {
        matches!(self, Self::InvalidParam(_))
    }

    /// Check if this is a "missing parameter" error
    pub fn is_missing_param(&self) -> bool {
        matches!(self, Self::MissingParam(_))
    }

    /// Check if the call was rejected for lack of credentials
    pub fn is_authorization_required(&self) -> bool {
        matches!(self, Self::AuthorizationRequired(_))
    }

    /// Check if credentials or impersonation were rejected
    pub fn is_authentication_failed(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }
}
