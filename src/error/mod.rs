//! Error type shared by the client, the section services and the query cache.
//!
//! Failures are never wrapped on their way up. [`report`] logs a detailed
//! description and hands back the very same value, so the retry loop in
//! [`crate::query`] and the caller both see the original error kind.

use std::error::Error as _;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::error;

/// Longest body excerpt included in a described HTTP error.
const BODY_EXCERPT_LEN: usize = 200;

/// Errors produced while fetching content.
#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status} {reason}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid value for the {name} header")]
    InvalidHeader { name: &'static str },

    #[error("query {key} holds a value of a different type")]
    TypeMismatch { key: String },
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network or TLS failure, timeout, or a response that could not be read.
    Transport,
    /// The backend answered with a non-2xx status.
    Http,
    /// The body did not match the expected shape.
    Decode,
    /// Misuse on this side: bad configuration or a mistyped cache key.
    Local,
}

impl Error {
    /// Returns the taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::Timeout(_) => ErrorKind::Transport,
            Self::Status { .. } => ErrorKind::Http,
            Self::Decode(_) => ErrorKind::Decode,
            Self::InvalidUrl { .. } | Self::InvalidHeader { .. } | Self::TypeMismatch { .. } => {
                ErrorKind::Local
            }
        }
    }

    /// Returns `true` if another attempt could succeed.
    ///
    /// Every remote failure counts, 4xx included; only local misuse is final.
    pub fn is_retryable(&self) -> bool {
        self.kind() != ErrorKind::Local
    }

    /// Returns the HTTP status for [`Error::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Builds a detailed, human-readable message for `err`.
pub fn describe(err: &Error) -> String {
    match err {
        Error::Transport(e) => {
            let stage = if e.is_connect() {
                "cannot connect"
            } else if e.is_body() || e.is_decode() {
                "response body could not be read"
            } else if e.is_builder() {
                "request could not be built"
            } else {
                "request failed"
            };
            let target = e.url().map_or_else(String::new, |u| format!(" to {u}"));
            let mut message = format!("{stage}{target}");
            let mut cause = e.source();
            while let Some(inner) = cause {
                message.push_str(": ");
                message.push_str(&inner.to_string());
                cause = inner.source();
            }
            message
        }
        Error::Timeout(after) => {
            format!("no complete response within {} ms", after.as_millis())
        }
        Error::Status {
            status,
            reason,
            body,
        } => {
            let reason = if reason.is_empty() {
                StatusCode::from_u16(*status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown Status")
            } else {
                reason.as_str()
            };
            let excerpt = excerpt(body);
            if excerpt.is_empty() {
                format!("HTTP {status} {reason}")
            } else {
                format!("HTTP {status} {reason}: {excerpt}")
            }
        }
        Error::Decode(e) => format!(
            "unexpected response shape at line {} column {} ({:?}): {e}",
            e.line(),
            e.column(),
            e.classify()
        ),
        other => other.to_string(),
    }
}

/// Logs `err` as `"{context} service error: {message}"` and returns it unchanged.
///
/// # Examples
///
/// ```
/// use rcms::error::{report, Error, ErrorKind};
///
/// let err = report("hero", Error::TypeMismatch { key: "hero".into() });
/// assert_eq!(err.kind(), ErrorKind::Local);
/// ```
pub fn report(context: &str, err: Error) -> Error {
    let message = describe(&err);
    error!(
        context,
        kind = ?err.kind(),
        status = err.status(),
        "{context} service error: {message}"
    );
    err
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_owned(),
    }
}
