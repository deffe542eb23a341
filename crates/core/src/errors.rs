//! Error types for authentication operations
//!
//! Three families of failure are kept apart on purpose:
//!
//! - [`Error`] covers configuration and setup problems. These surface while
//!   loading settings, never while authenticating a request.
//! - [`StoreError`] is what an external principal store reports when it cannot
//!   answer (unreachable, timed out, backend fault).
//! - [`VerificationUnavailable`] is the single transient failure the verifier
//!   and cache hand back to callers. It is never cached.
//!
//! A credential that is simply wrong is not an error at all; it is an
//! [`AuthenticationOutcome::Rejected`](crate::AuthenticationOutcome) value.

use std::path::PathBuf;
use std::time::Duration;

/// Result type alias for configuration and setup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for configuration and setup
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Cache policy option errors
    #[error("invalid cache policy option '{option}': {message}")]
    InvalidPolicy { option: String, message: String },

    /// Duration literal errors
    #[error("invalid duration '{value}': {message}")]
    InvalidDuration { value: String, message: String },

    /// Field validation errors
    #[error("validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a cache policy option error
    #[must_use]
    pub fn invalid_policy(option: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidPolicy {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Create a duration literal error
    #[must_use]
    pub fn invalid_duration(value: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidDuration {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a file system error
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a lazy message
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::configuration(format!("{}: {}", message.into(), e.into())))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| Error::configuration(format!("{}: {}", f(), e.into())))
    }
}

/// Failures reported by an external principal store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be reached
    #[error("principal store unreachable: {message}")]
    Unreachable { message: String },

    /// The lookup did not complete in time
    #[error("principal store lookup timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Any other backend fault
    #[error("principal store backend failure: {message}")]
    Backend {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StoreError {
    /// Create an unreachable error
    #[must_use]
    pub fn unreachable(message: impl Into<String>) -> Self {
        StoreError::Unreachable {
            message: message.into(),
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(duration: Duration) -> Self {
        StoreError::Timeout { duration }
    }

    /// Create a backend error with a source
    #[must_use]
    pub fn backend(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        StoreError::Backend {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Verification could not be completed because of an infrastructure failure.
///
/// Callers should treat this as retryable (service unavailable). It is
/// distinct from a rejection and is never served from cache.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("credential verification unavailable: {reason}")]
pub struct VerificationUnavailable {
    reason: String,
}

impl VerificationUnavailable {
    /// Create a new unavailable error with a diagnostic reason
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Diagnostic reason, for logs only
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<StoreError> for VerificationUnavailable {
    fn from(error: StoreError) -> Self {
        VerificationUnavailable::new(error.to_string())
    }
}
