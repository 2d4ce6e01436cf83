//! Failure descriptions surfaced to screens.
//!
//! A screen shows exactly one message per failed attempt. Transport and
//! internal failures are reduced to an [`ErrorDescription`] before they reach
//! the state machine, so screens never see adapter error types.

use std::fmt;

use super::TraceId;

/// Message shown when no usable text is available.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong, please try again.";

/// Stable machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The server refused the request as malformed or invalid.
    InvalidRequest,
    /// The server refused the credentials.
    Unauthorized,
    /// The server failed while handling the request.
    ServerError,
    /// The server could not be reached or timed out.
    Network,
    /// The server answered with a body the client cannot read.
    InvalidResponse,
    /// Something failed inside the client itself.
    InternalError,
}

/// Validation errors emitted by [`ErrorDescription::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDescriptionValidationError {
    /// The message was empty once trimmed.
    EmptyMessage,
}

impl fmt::Display for ErrorDescriptionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for ErrorDescriptionValidationError {}

/// Human-readable failure carried by a failed screen state.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
/// - `trace_id` is the trace identifier in scope at construction, if any.
///
/// # Examples
/// ```
/// use client::domain::{DEFAULT_ERROR_MESSAGE, ErrorCode, ErrorDescription};
///
/// let err = ErrorDescription::new(ErrorCode::Unauthorized, "Invalid email or password.");
/// assert_eq!(err.message(), "Invalid email or password.");
///
/// let fallback = ErrorDescription::new(ErrorCode::Network, "   ");
/// assert_eq!(fallback.message(), DEFAULT_ERROR_MESSAGE);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDescription {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
}

impl ErrorDescription {
    /// Create a description, substituting [`DEFAULT_ERROR_MESSAGE`] for blank text.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self::fallback(code))
    }

    /// Fallible constructor that validates the message content.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorDescriptionValidationError::EmptyMessage`] when the
    /// message is blank.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorDescriptionValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorDescriptionValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
        })
    }

    /// Description carrying [`DEFAULT_ERROR_MESSAGE`].
    #[must_use]
    pub fn fallback(code: ErrorCode) -> Self {
        Self {
            code,
            message: DEFAULT_ERROR_MESSAGE.to_owned(),
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Message suitable for display.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Trace identifier of the attempt that failed, if one was in scope.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}

impl fmt::Display for ErrorDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ErrorDescription {}
