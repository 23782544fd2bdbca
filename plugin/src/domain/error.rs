//! Errors raised by the InfraKitchen API contract.
//!
//! Adapters never recover from these locally. Every failure travels back to
//! the caller, which hands it to the host notification system.

use serde_json::{Map, Value};
use thiserror::Error;

/// Error code reported when a structured error body names none.
pub const UNKNOWN_ERROR_CODE: &str = "unknown_error";

/// Failure of one InfraKitchen API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status and a recognised error body.
    #[error("{message}")]
    Structured {
        /// HTTP status code.
        status: u16,
        /// Human-readable message from the body.
        message: String,
        /// Machine-readable code from the body, or [`UNKNOWN_ERROR_CODE`].
        error_code: String,
        /// Extra context from the body; empty when none was sent.
        metadata: Map<String, Value>,
    },

    /// HTTP or integration failure without a structured body.
    #[error("{message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },

    /// A successful response carried a body that is not JSON.
    #[error("{message}")]
    Parse {
        /// Description of the decode failure.
        message: String,
    },

    /// The identity provider could not supply usable credentials.
    #[error("{message}")]
    Credentials {
        /// Description of the failure.
        message: String,
    },

    /// The call was rejected before any request was sent.
    #[error("{message}")]
    InvalidRequest {
        /// Description of the rejected input.
        message: String,
    },
}

impl ApiError {
    /// Build a [`ApiError::Transport`].
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Build a [`ApiError::Parse`].
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Build a [`ApiError::Credentials`].
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials {
            message: message.into(),
        }
    }

    /// Build a [`ApiError::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Transport error for a non-2xx status without a usable body, worded
    /// `"<status> <status text>."`, or `"<status>."` when the status has no
    /// reason phrase.
    pub fn status_only(status: u16, status_text: &str) -> Self {
        match status_text.trim() {
            "" => Self::transport(format!("{status}.")),
            text => Self::transport(format!("{status} {text}.")),
        }
    }

    /// HTTP status carried by a structured error.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Structured { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine-readable code carried by a structured error.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Structured { error_code, .. } => Some(error_code.as_str()),
            _ => None,
        }
    }

    /// Whether the backend described the failure with a structured body.
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Structured { .. })
    }
}

/// Classified content of a non-2xx response body.
///
/// Bodies are decoded against a fixed schema first; this enum records which
/// shape matched so a malformed structured error can never pass for a
/// legitimate one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    /// Message and error code are both present and non-empty.
    Coded {
        /// Human-readable message.
        message: String,
        /// Machine-readable code.
        error_code: String,
        /// Extra context, possibly empty.
        metadata: Map<String, Value>,
    },
    /// Only a non-empty message is present.
    MessageOnly {
        /// Human-readable message.
        message: String,
        /// Extra context, possibly empty.
        metadata: Map<String, Value>,
    },
    /// The body is JSON but matches neither shape.
    Unrecognised,
}

impl ErrorBody {
    /// Turn the classified body into the error surfaced to callers.
    pub fn into_api_error(self, status: u16, status_text: &str) -> ApiError {
        match self {
            Self::Coded {
                message,
                error_code,
                metadata,
            } => ApiError::Structured {
                status,
                message,
                error_code,
                metadata,
            },
            Self::MessageOnly { message, metadata } => ApiError::Structured {
                status,
                message,
                error_code: UNKNOWN_ERROR_CODE.to_owned(),
                metadata,
            },
            Self::Unrecognised => ApiError::status_only(status, status_text),
        }
    }
}
