use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Message surfaced when the server answers 503 without a message.
pub const UNAVAILABLE_MESSAGE: &str = "Service is temporarily unavailable. Please try again later.";

/// Message surfaced when a request was sent but nothing came back.
pub const NO_RESPONSE_MESSAGE: &str =
    "No response received from server. Please check your connection.";

/// Structured error body returned by the API (`{ timestamp, status, message, path }`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl ErrorBody {
    /// The human-readable message, if present and non-empty.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Raw failure of a single HTTP exchange.
///
/// Never handed to callers of the services directly: every service
/// operation funnels it through [`ServiceError::normalize`].
#[derive(Debug, Error)]
pub enum Error {
    // ── Response ────────────────────────────────────────────────────
    /// The server answered with a non-success status.
    #[error("HTTP {status}")]
    Status {
        status: u16,
        body: Option<ErrorBody>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// The request went out but no response ever arrived
    /// (connection refused, reset, timeout).
    #[error("no response received: {0}")]
    NoResponse(String),

    /// Client-side transport failure before anything was sent.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Building the HTTP client failed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization of a success body failed.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Classify a `reqwest` send failure.
    ///
    /// Builder errors never reached the wire; everything else did.
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Transport(err)
        } else {
            Self::NoResponse(err.to_string())
        }
    }

    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// A success response whose body could not be read in full. The server
    /// did answer, so this is a data failure rather than a lost connection.
    pub(crate) fn from_body_read(err: &reqwest::Error) -> Self {
        Self::Deserialization {
            message: format!("failed to read response body: {err}"),
            body: String::new(),
        }
    }

    /// Returns `true` if this is a "not found" response.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Which normalization branch produced a [`ServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The server supplied a structured message.
    Server,
    /// HTTP 503 without a message.
    Unavailable,
    /// The request was sent but no response was received.
    NoResponse,
    /// Anything else: the operation's default message.
    Other,
}

/// Normalized, user-facing failure of a service operation.
///
/// Carries exactly one message chosen by the four-branch rule in
/// [`ServiceError::normalize`], plus the HTTP status when one exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    kind: FailureKind,
    message: String,
    status: Option<u16>,
}

impl ServiceError {
    /// Translate a raw failure into its user-facing form.
    ///
    /// 1. a non-empty server `message` wins verbatim,
    /// 2. else HTTP 503 maps to [`UNAVAILABLE_MESSAGE`],
    /// 3. else a sent-but-unanswered request maps to [`NO_RESPONSE_MESSAGE`],
    /// 4. else `default_message`.
    pub fn normalize(err: Error, default_message: &str) -> Self {
        debug!(error = %err, "normalizing request failure");
        let normalized = match err {
            Error::Status { status, body } => {
                if let Some(message) = body.as_ref().and_then(ErrorBody::message) {
                    Self {
                        kind: FailureKind::Server,
                        message: message.to_owned(),
                        status: Some(status),
                    }
                } else if status == 503 {
                    Self {
                        kind: FailureKind::Unavailable,
                        message: UNAVAILABLE_MESSAGE.into(),
                        status: Some(status),
                    }
                } else {
                    Self::other(default_message, Some(status))
                }
            }
            Error::NoResponse(_) => Self {
                kind: FailureKind::NoResponse,
                message: NO_RESPONSE_MESSAGE.into(),
                status: None,
            },
            Error::Transport(_)
            | Error::InvalidUrl(_)
            | Error::ClientBuild(_)
            | Error::Deserialization { .. } => Self::other(default_message, None),
        };
        debug!(kind = ?normalized.kind, status = ?normalized.status, "request failure normalized");
        normalized
    }

    fn other(default_message: &str, status: Option<u16>) -> Self {
        Self {
            kind: FailureKind::Other,
            message: default_message.to_owned(),
            status,
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: &str = "Failed to create device. Please try again.";

    fn status(status: u16, message: Option<&str>) -> Error {
        Error::Status {
            status,
            body: Some(ErrorBody {
                timestamp: Some("2025-01-01T10:00:00".into()),
                status: Some(status),
                message: message.map(str::to_owned),
                path: Some("/api/devices".into()),
            }),
        }
    }

    #[test]
    fn server_message_is_surfaced_verbatim() {
        let err = ServiceError::normalize(status(400, Some("Device name taken")), DEFAULT);
        assert_eq!(err.kind(), FailureKind::Server);
        assert_eq!(err.to_string(), "Device name taken");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn server_message_beats_503() {
        let err = ServiceError::normalize(status(503, Some("Maintenance window")), DEFAULT);
        assert_eq!(err.message(), "Maintenance window");
    }

    #[test]
    fn bare_503_is_unavailable() {
        let err = ServiceError::normalize(
            Error::Status {
                status: 503,
                body: None,
            },
            DEFAULT,
        );
        assert_eq!(err.kind(), FailureKind::Unavailable);
        assert_eq!(err.message(), UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn empty_message_counts_as_absent() {
        let err = ServiceError::normalize(status(503, Some("")), DEFAULT);
        assert_eq!(err.kind(), FailureKind::Unavailable);
    }

    #[test]
    fn no_response_is_connectivity() {
        let err = ServiceError::normalize(Error::NoResponse("connection refused".into()), DEFAULT);
        assert_eq!(err.kind(), FailureKind::NoResponse);
        assert_eq!(err.message(), NO_RESPONSE_MESSAGE);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn anything_else_uses_default() {
        let err = ServiceError::normalize(status(500, None), DEFAULT);
        assert_eq!(err.kind(), FailureKind::Other);
        assert_eq!(err.message(), DEFAULT);

        let err = ServiceError::normalize(
            Error::Deserialization {
                message: "expected struct".into(),
                body: "<html>".into(),
            },
            DEFAULT,
        );
        assert_eq!(err.message(), DEFAULT);
    }
}
