//! Classified outcome of one remote call.
//!
//! Adapters report either a transport-level response or a [`TransportError`];
//! [`classify`] folds both into a [`RemoteResult`] exactly once, with no
//! retries. The repository matches on the result to pick its fallback branch.

use crate::domain::ErrorCode;
use crate::domain::ports::TransportError;

/// Message used when a success status carries no payload.
pub const EMPTY_RESPONSE_MESSAGE: &str = ErrorCode::EmptyResponse.as_str();

/// Message used when a failed response has no reason phrase.
pub const UNKNOWN_MESSAGE: &str = ErrorCode::Unknown.as_str();

/// Three-way outcome of a remote call attempt.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteResult<T> {
    /// The call succeeded and produced a payload.
    Success(T),
    /// The call completed without a usable payload.
    Error {
        /// Reason phrase or a fixed category tag.
        message: String,
        /// HTTP status, absent for empty success responses.
        code: Option<u16>,
    },
    /// The call failed before a response was obtained.
    Exception(TransportError),
}

/// A response as seen by the transport, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse<T> {
    /// Numeric HTTP status.
    pub status: u16,
    /// Reason phrase, when the transport knows one.
    pub reason: Option<String>,
    /// Decoded body; `None` when the response was empty.
    pub body: Option<T>,
}

impl<T> TransportResponse<T> {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fold one transport outcome into a [`RemoteResult`].
///
/// # Examples
/// ```
/// use contacts::domain::{RemoteResult, TransportResponse, classify};
///
/// let response = TransportResponse { status: 404, reason: Some("Not Found".into()), body: None::<()> };
/// assert_eq!(
///     classify(Ok(response)),
///     RemoteResult::Error { message: "Not Found".into(), code: Some(404) },
/// );
/// ```
pub fn classify<T>(outcome: Result<TransportResponse<T>, TransportError>) -> RemoteResult<T> {
    let response = match outcome {
        Ok(response) => response,
        Err(error) => return RemoteResult::Exception(error),
    };

    if response.is_success() {
        return match response.body {
            Some(body) => RemoteResult::Success(body),
            None => RemoteResult::Error {
                message: EMPTY_RESPONSE_MESSAGE.to_owned(),
                code: None,
            },
        };
    }

    let message = response
        .reason
        .filter(|reason| !reason.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_MESSAGE.to_owned());
    RemoteResult::Error {
        message,
        code: Some(response.status),
    }
}

impl<T> RemoteResult<T> {
    /// Whether the call produced a payload.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Category for a failed result; `None` on success.
    ///
    /// Errors without a mapped status report `empty-response` when no code is
    /// present and `unknown` otherwise.
    pub fn failure_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Success(_) => None,
            Self::Error { code: None, .. } => Some(ErrorCode::EmptyResponse),
            Self::Error {
                code: Some(status), ..
            } => Some(ErrorCode::from_status(*status).unwrap_or(ErrorCode::Unknown)),
            Self::Exception(error) => Some(error.error_code()),
        }
    }

    /// Transform the success payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RemoteResult<U> {
        match self {
            Self::Success(body) => RemoteResult::Success(f(body)),
            Self::Error { message, code } => RemoteResult::Error { message, code },
            Self::Exception(error) => RemoteResult::Exception(error),
        }
    }
}

/// Human-facing message for a non-success result.
///
/// Mapped statuses and exceptions yield their tag; unmapped statuses yield
/// the raw message from the transport. A `Success` has nothing to explain
/// and yields `unknown`.
///
/// # Examples
/// ```
/// use contacts::domain::{RemoteResult, handle_error};
///
/// let teapot: RemoteResult<()> = RemoteResult::Error { message: "I'm a teapot".into(), code: Some(418) };
/// assert_eq!(handle_error(&teapot), "I'm a teapot");
///
/// let denied: RemoteResult<()> = RemoteResult::Error { message: "Forbidden".into(), code: Some(403) };
/// assert_eq!(handle_error(&denied), "forbidden");
/// ```
pub fn handle_error<T>(result: &RemoteResult<T>) -> String {
    match result {
        RemoteResult::Error { message, code } => code
            .and_then(ErrorCode::from_status)
            .map_or_else(|| message.clone(), |mapped| mapped.as_str().to_owned()),
        RemoteResult::Exception(error) => error.error_code().as_str().to_owned(),
        RemoteResult::Success(_) => UNKNOWN_MESSAGE.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn response(status: u16, reason: Option<&str>, body: Option<u8>) -> TransportResponse<u8> {
        TransportResponse {
            status,
            reason: reason.map(str::to_owned),
            body,
        }
    }

    #[rstest]
    #[case(200)]
    #[case(201)]
    #[case(204)]
    fn success_status_with_body_is_success(#[case] status: u16) {
        assert_eq!(classify(Ok(response(status, None, Some(7)))), RemoteResult::Success(7));
    }

    #[rstest]
    fn success_status_without_body_is_empty_response_error() {
        let result = classify(Ok(response(200, Some("OK"), None)));
        assert_eq!(
            result,
            RemoteResult::Error {
                message: "empty-response".to_owned(),
                code: None,
            }
        );
        assert_eq!(result.failure_code(), Some(ErrorCode::EmptyResponse));
    }

    #[rstest]
    fn failure_status_keeps_reason_and_code() {
        let result = classify(Ok(response(503, Some("Service Unavailable"), Some(1))));
        assert_eq!(
            result,
            RemoteResult::Error {
                message: "Service Unavailable".to_owned(),
                code: Some(503),
            }
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some("  "))]
    fn failure_status_without_reason_uses_unknown(#[case] reason: Option<&str>) {
        let result = classify(Ok(response(520, reason, None)));
        assert_eq!(
            result,
            RemoteResult::Error {
                message: "unknown".to_owned(),
                code: Some(520),
            }
        );
    }

    #[rstest]
    fn transport_errors_become_exceptions() {
        let error = TransportError::timeout("deadline elapsed");
        let result: RemoteResult<u8> = classify(Err(error.clone()));
        assert_eq!(result, RemoteResult::Exception(error));
    }

    #[rstest]
    #[case(400, "bad-request")]
    #[case(401, "unauthorized")]
    #[case(403, "forbidden")]
    #[case(404, "not-found")]
    #[case(500, "server-error")]
    #[case(409, "Conflict")]
    fn handle_error_maps_status_codes(#[case] status: u16, #[case] expected: &str) {
        let result: RemoteResult<()> = RemoteResult::Error {
            message: "Conflict".to_owned(),
            code: Some(status),
        };
        assert_eq!(handle_error(&result), expected);
    }

    #[rstest]
    #[case(TransportError::unresolvable_host("dns"), "no-internet")]
    #[case(TransportError::timeout("slow"), "timeout")]
    #[case(TransportError::other("reset"), "unknown")]
    fn handle_error_maps_exceptions(#[case] error: TransportError, #[case] expected: &str) {
        let result: RemoteResult<()> = RemoteResult::Exception(error);
        assert_eq!(handle_error(&result), expected);
    }

    #[rstest]
    fn handle_error_on_success_is_unknown() {
        assert_eq!(handle_error(&RemoteResult::Success(())), "unknown");
    }

    #[rstest]
    fn empty_response_error_message_survives_handle_error() {
        let result: RemoteResult<()> = classify(Ok(TransportResponse {
            status: 200,
            reason: None,
            body: None,
        }));
        assert_eq!(handle_error(&result), "empty-response");
    }

    #[rstest]
    fn map_preserves_failures() {
        let result: RemoteResult<u8> = RemoteResult::Error {
            message: "Forbidden".to_owned(),
            code: Some(403),
        };
        let mapped = result.map(u16::from);
        assert_eq!(mapped.failure_code(), Some(ErrorCode::Forbidden));
        assert!(RemoteResult::Success(3_u8).map(u16::from).is_success());
    }
}
