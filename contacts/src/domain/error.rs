//! Domain-level error types.
//!
//! These errors are transport agnostic. The CLI (or any UI layer) maps the
//! stable [`ErrorCode`] tags to localised prose; the domain never does.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable machine-readable error tag describing the failure category.
///
/// The set is closed: validation tags, transport tags, and `unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Contact name is blank.
    #[serde(rename = "name-required")]
    NameRequired,
    /// Contact last name is blank.
    #[serde(rename = "lastname-required")]
    LastNameRequired,
    /// Contact phone is blank.
    #[serde(rename = "phone-required")]
    PhoneRequired,
    /// Input could not be turned into a contact at all.
    #[serde(rename = "fix-fields")]
    FixFields,
    /// Anything not covered by a more specific tag.
    #[serde(rename = "unknown")]
    Unknown,
    /// The remote answered with a success status but no payload.
    #[serde(rename = "empty-response")]
    EmptyResponse,
    /// The remote host could not be reached.
    #[serde(rename = "no-internet")]
    NoInternet,
    /// The remote call timed out.
    #[serde(rename = "timeout")]
    Timeout,
    /// HTTP 400.
    #[serde(rename = "bad-request")]
    BadRequest,
    /// HTTP 401.
    #[serde(rename = "unauthorized")]
    Unauthorized,
    /// HTTP 403.
    #[serde(rename = "forbidden")]
    Forbidden,
    /// HTTP 404.
    #[serde(rename = "not-found")]
    NotFound,
    /// HTTP 500.
    #[serde(rename = "server-error")]
    ServerError,
}

impl ErrorCode {
    /// Every tag, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::NameRequired,
        Self::LastNameRequired,
        Self::PhoneRequired,
        Self::FixFields,
        Self::Unknown,
        Self::EmptyResponse,
        Self::NoInternet,
        Self::Timeout,
        Self::BadRequest,
        Self::Unauthorized,
        Self::Forbidden,
        Self::NotFound,
        Self::ServerError,
    ];

    /// Return the wire tag for this code.
    ///
    /// # Examples
    /// ```
    /// use contacts::domain::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::LastNameRequired.as_str(), "lastname-required");
    /// ```
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NameRequired => "name-required",
            Self::LastNameRequired => "lastname-required",
            Self::PhoneRequired => "phone-required",
            Self::FixFields => "fix-fields",
            Self::Unknown => "unknown",
            Self::EmptyResponse => "empty-response",
            Self::NoInternet => "no-internet",
            Self::Timeout => "timeout",
            Self::BadRequest => "bad-request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not-found",
            Self::ServerError => "server-error",
        }
    }

    /// Map an HTTP status to its category, if the taxonomy names one.
    ///
    /// Unmapped statuses return `None`; callers fall back to the raw
    /// transport message.
    pub const fn from_status(status: u16) -> Option<Self> {
        match status {
            400 => Some(Self::BadRequest),
            401 => Some(Self::Unauthorized),
            403 => Some(Self::Forbidden),
            404 => Some(Self::NotFound),
            500 => Some(Self::ServerError),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error tag: {0}")]
pub struct UnknownErrorTag(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorTag;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == raw)
            .ok_or_else(|| UnknownErrorTag(raw.to_owned()))
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use contacts::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::NotFound, "not-found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    /// The message was blank after trimming.
    EmptyMessage,
}

impl fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

impl Error {
    /// Create a new error, falling back to the code's tag when the message
    /// is blank.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self::from_code(code))
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Build an error whose message is the code's own tag.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.as_str().to_owned(),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Message carried alongside the code.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use contacts::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::unknown("store closed").with_details(json!({ "op": "upsert" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::NameRequired`].
    pub fn name_required() -> Self {
        Self::from_code(ErrorCode::NameRequired)
    }

    /// Convenience constructor for [`ErrorCode::LastNameRequired`].
    pub fn last_name_required() -> Self {
        Self::from_code(ErrorCode::LastNameRequired)
    }

    /// Convenience constructor for [`ErrorCode::PhoneRequired`].
    pub fn phone_required() -> Self {
        Self::from_code(ErrorCode::PhoneRequired)
    }

    /// Convenience constructor for [`ErrorCode::FixFields`].
    pub fn fix_fields(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::FixFields, message)
    }

    /// Convenience constructor for [`ErrorCode::Unknown`].
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unknown, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            details,
        } = value;

        let mut error = Self::try_new(code, message)?;
        error.details = details;
        Ok(error)
    }
}

#[cfg(test)]
mod tests;
