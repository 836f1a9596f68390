//! Client error type.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Failures surfaced by the client and the views built on it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The request could not be built, e.g. a bad path or content type.
    #[error("invalid request: {message}")]
    Request {
        /// What was wrong with the request.
        message: String,
    },
    /// The server could not be reached or the connection failed.
    #[error("transport error: {message}")]
    Transport {
        /// Underlying transport error.
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Decoder error.
        message: String,
    },
    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Machine-readable code from the error envelope, when present.
        code: Option<String>,
        /// Server-supplied message.
        message: String,
    },
    /// The recently-viewed file could not be read or written.
    #[error("recently-viewed storage error: {message}")]
    Storage {
        /// Underlying IO error.
        message: String,
    },
}

impl ClientError {
    /// Construct a [`ClientError::Request`].
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Construct a [`ClientError::Transport`].
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Construct a [`ClientError::Decode`].
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Construct a [`ClientError::Storage`].
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// HTTP status for server-reported failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server reported 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    /// Build a [`ClientError::Status`] from a non-success response body.
    ///
    /// The server's error envelope supplies the code and message when present;
    /// otherwise the raw body or the canonical reason phrase is used.
    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        #[derive(Deserialize)]
        struct Envelope {
            code: Option<String>,
            message: Option<String>,
        }

        let envelope = serde_json::from_slice::<Envelope>(body).ok();
        let code = envelope.as_ref().and_then(|e| e.code.clone());
        let message = envelope
            .and_then(|e| e.message)
            .or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_owned();
                (!text.is_empty()).then_some(text)
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_owned()
            });
        Self::Status {
            status: status.as_u16(),
            code,
            message,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn status_errors_prefer_the_server_envelope() {
        let err = ClientError::from_status(
            StatusCode::BAD_REQUEST,
            br#"{"code":"invalid_request","message":"please provide a valid price greater than zero"}"#,
        );
        assert_eq!(
            err,
            ClientError::Status {
                status: 400,
                code: Some("invalid_request".to_owned()),
                message: "please provide a valid price greater than zero".to_owned(),
            }
        );
    }

    #[rstest]
    #[case(b"upstream exploded".as_slice(), "upstream exploded")]
    #[case(b"".as_slice(), "Internal Server Error")]
    fn status_errors_fall_back_to_body_or_reason(#[case] body: &[u8], #[case] expected: &str) {
        let err = ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, body);
        assert!(matches!(err, ClientError::Status { ref message, code: None, .. } if message == expected));
    }

    #[rstest]
    fn not_found_is_detected_from_status() {
        let err = ClientError::from_status(StatusCode::NOT_FOUND, b"");
        assert!(err.is_not_found());
        assert!(!ClientError::transport("refused").is_not_found());
    }
}
