//! Ticket API errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when calling the ticket API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("Ticket API unreachable: {0}")]
    Network(#[source] reqwest::Error),

    /// The API answered with a non-success status.
    ///
    /// `message` is the `error` field of the JSON body, when there was one.
    #[error("Ticket API rejected request: {status}{}", message_suffix(.message))]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },

    /// A success response whose body could not be decoded.
    #[error("Ticket API response error: {0}")]
    Decode(String),

    /// An endpoint URL could not be built from the configured base.
    #[error("Invalid ticket API URL: {0}")]
    Url(#[from] url::ParseError),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" - {m}"))
        .unwrap_or_default()
}

impl ApiError {
    /// The server-provided error text, if the API sent one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether this is a 404 whose error text is exactly `text`.
    #[must_use]
    pub fn is_not_found_with(&self, text: &str) -> bool {
        matches!(
            self,
            Self::Rejected { status, message: Some(m) }
                if *status == StatusCode::NOT_FOUND && m == text
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(status: StatusCode, message: Option<&str>) -> ApiError {
        ApiError::Rejected {
            status,
            message: message.map(String::from),
        }
    }

    #[test]
    fn test_is_not_found_with_exact_text() {
        let err = rejected(StatusCode::NOT_FOUND, Some("User not found"));
        assert!(err.is_not_found_with("User not found"));
    }

    #[test]
    fn test_is_not_found_with_requires_404() {
        let err = rejected(StatusCode::UNAUTHORIZED, Some("User not found"));
        assert!(!err.is_not_found_with("User not found"));
    }

    #[test]
    fn test_is_not_found_with_requires_exact_text() {
        let wrong_case = rejected(StatusCode::NOT_FOUND, Some("user not found"));
        assert!(!wrong_case.is_not_found_with("User not found"));

        let no_body = rejected(StatusCode::NOT_FOUND, None);
        assert!(!no_body.is_not_found_with("User not found"));
    }

    #[test]
    fn test_display() {
        let err = rejected(StatusCode::BAD_REQUEST, Some("Título requerido"));
        assert_eq!(
            err.to_string(),
            "Ticket API rejected request: 400 Bad Request - Título requerido"
        );
        let err = rejected(StatusCode::BAD_GATEWAY, None);
        assert_eq!(err.to_string(), "Ticket API rejected request: 502 Bad Gateway");
    }

    #[test]
    fn test_server_message() {
        assert_eq!(
            rejected(StatusCode::CONFLICT, Some("exists")).server_message(),
            Some("exists")
        );
        assert_eq!(ApiError::Decode("bad".into()).server_message(), None);
    }
}
