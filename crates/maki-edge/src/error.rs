//! HTTP error responses with fixed wire bodies.
//!
//! The proxy's error surface is deliberately small and generic: clients get
//! the same body for every failure of a category, and the interesting
//! detail stays in the server log.

use std::borrow::Cow;
use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// A specialized [`Result`] type for edge handlers.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Enumeration of the error categories the edge can answer with.
///
/// Each variant maps to one status code and one fixed response body.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 401 Unauthorized - no session cookie accompanied the request.
    Unauthorized,
    /// 500 Internal Server Error - forwarding to the backend failed.
    UpstreamFailure,
    /// 500 Internal Server Error - anything else.
    #[default]
    Internal,
}

impl ErrorKind {
    /// Returns the response status for this kind.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::UpstreamFailure | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the fixed body message for this kind.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Unauthorized => "No autorizado",
            Self::UpstreamFailure | Self::Internal => {
                "Error interno en el servidor. Intente de nuevo más tarde."
            }
        }
    }

    /// Attaches logging context, producing a full [`Error`].
    pub fn with_context(self, context: impl Into<Cow<'static, str>>) -> Error {
        Error {
            kind: self,
            context: Some(context.into()),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.status())
    }
}

impl IntoResponse for ErrorKind {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({ "message": self.message() })),
        )
            .into_response()
    }
}

/// An edge error: a kind plus optional context for the log.
///
/// The context never reaches the client; the response body depends only on
/// the kind.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    kind: ErrorKind,
    context: Option<Cow<'static, str>>,
}

impl Error {
    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the logging context, if any.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Some(context) = &self.context {
            tracing::error!(
                target: crate::TRACING_TARGET_PROXY,
                kind = ?self.kind,
                context = %context,
                "request failed"
            );
        }
        self.kind.into_response()
    }
}
