//! Error types for the HTTP parser.

use thiserror::Error;

use crate::server::StatusCode;

/// Errors that can occur while parsing a request line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The request contained no tokens at all.
    #[error("Empty request")]
    EmptyRequest,

    /// The method token is not one the server knows how to serve.
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request line is malformed (missing target or too many tokens).
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// The version token is not a known HTTP version.
    #[error("Invalid HTTP version: {0}")]
    InvalidVersion(String),

    /// The request line grew past the configured maximum length.
    #[error("Request line exceeds {0} bytes")]
    RequestLineTooLong(usize),
}

impl Error {
    /// The status code sent to the client for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::UnsupportedMethod(_) => StatusCode::MethodNotAllowed,
            Error::RequestLineTooLong(_) => StatusCode::RequestUriTooLong,
            Error::EmptyRequest
            | Error::MalformedRequestLine(_)
            | Error::InvalidVersion(_) => StatusCode::BadRequest,
        }
    }

    /// The text placed after the status code in the error status line.
    pub fn status_text(&self) -> &'static str {
        match self {
            Error::UnsupportedMethod(_) => "Not a supported method",
            other => other.status().reason_phrase(),
        }
    }
}
