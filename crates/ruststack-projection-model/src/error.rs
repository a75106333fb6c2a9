//! Projection error envelope.
//!
//! Errors carry a short code, a fully-qualified `__type` string compatible
//! with the DynamoDB JSON protocol, and a human-readable message. The core
//! never decides how these reach a client; callers map them onto whatever
//! transport they speak.

use std::fmt;

/// Error codes a projection call can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ProjectionErrorCode {
    /// Caller input is invalid (bad expression, conflicting parameters).
    #[default]
    ValidationException,
    /// The request body could not be decoded.
    SerializationException,
    /// Unexpected failure inside the engine.
    InternalServerError,
}

impl ProjectionErrorCode {
    /// Returns the fully-qualified error type string for the JSON `__type` field.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::ValidationException => "com.amazon.coral.validate#ValidationException",
            Self::SerializationException => {
                "com.amazonaws.dynamodb.v20120810#SerializationException"
            }
            Self::InternalServerError => "com.amazonaws.dynamodb.v20120810#InternalServerError",
        }
    }

    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationException => "ValidationException",
            Self::SerializationException => "SerializationException",
            Self::InternalServerError => "InternalServerError",
        }
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::InternalServerError => http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationException | Self::SerializationException => {
                http::StatusCode::BAD_REQUEST
            }
        }
    }
}

impl fmt::Display for ProjectionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A projection error response.
#[derive(Debug)]
pub struct ProjectionError {
    /// The error code.
    pub code: ProjectionErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The HTTP status code a transport layer should use.
    pub status_code: http::StatusCode,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectionError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for ProjectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl ProjectionError {
    /// Create a new `ProjectionError` whose message is the code name.
    #[must_use]
    pub fn new(code: ProjectionErrorCode) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: code.as_str().to_owned(),
            code,
            source: None,
        }
    }

    /// Create a new `ProjectionError` with a custom message.
    #[must_use]
    pub fn with_message(code: ProjectionErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the `__type` string for the JSON error body.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        self.code.error_type()
    }

    /// Validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_message(ProjectionErrorCode::ValidationException, message)
    }

    /// Serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::with_message(ProjectionErrorCode::SerializationException, message)
    }

    /// Render the error as the JSON body used by the DynamoDB protocol:
    /// `{"__type": "...", "Message": "..."}`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "__type": self.error_type(),
            "Message": self.message,
        })
    }
}

/// Create a `ProjectionError` from an error code.
///
/// # Examples
///
/// ```
/// use ruststack_projection_model::projection_error;
/// use ruststack_projection_model::error::ProjectionErrorCode;
///
/// let err = projection_error!(ValidationException);
/// assert_eq!(err.code, ProjectionErrorCode::ValidationException);
///
/// let err = projection_error!(ValidationException, "bad path");
/// assert_eq!(err.message, "bad path");
/// ```
#[macro_export]
macro_rules! projection_error {
    ($code:ident) => {
        $crate::error::ProjectionError::new($crate::error::ProjectionErrorCode::$code)
    };
    ($code:ident, $msg:expr) => {
        $crate::error::ProjectionError::with_message(
            $crate::error::ProjectionErrorCode::$code,
            $msg,
        )
    };
}
