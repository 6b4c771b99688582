//! HTTP request-line parsing and representation.

use std::str::FromStr;

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;

/// A parsed request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// The request method (only GET and HEAD survive parsing)
    pub method: Method,
    /// The request target exactly as sent, including query and fragment
    pub target: String,
    /// The protocol version, HTTP/0.9 when the line carried none
    pub version: HttpVersion,
}

impl HttpRequest {
    /// Create a new request.
    pub fn new(method: Method, target: impl Into<String>, version: HttpVersion) -> Self {
        Self {
            method,
            target: target.into(),
            version,
        }
    }

    /// The target without its query string and fragment.
    pub fn path(&self) -> &str {
        let end = self.target.find(['?', '#']).unwrap_or(self.target.len());
        &self.target[..end]
    }

    /// The query string, if the target has one.
    pub fn query(&self) -> Option<&str> {
        let (_, rest) = self.target.split_once('?')?;
        Some(rest.split_once('#').map_or(rest, |(query, _)| query))
    }
}

/// How much of a request line has been received so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    /// A full line is present; the value is its length including the terminator.
    Complete(usize),
    /// No line terminator yet and the buffer is still within bounds.
    Incomplete,
    /// The line is, or will be, longer than the allowed maximum.
    TooLong,
}

/// Checks whether `buf` holds a complete request line of at most `max_len`
/// bytes (terminator excluded). Blank lines before the request line are
/// skipped.
pub fn request_line_status(buf: &[u8], max_len: usize) -> LineStatus {
    let start = leading_blank_len(buf);
    if start > max_len {
        return LineStatus::TooLong;
    }
    let rest = &buf[start..];
    match rest.iter().position(|&b| b == b'\n') {
        Some(pos) => {
            let line_len = if pos > 0 && rest[pos - 1] == b'\r' { pos - 1 } else { pos };
            if line_len > max_len {
                LineStatus::TooLong
            } else {
                LineStatus::Complete(start + pos + 1)
            }
        }
        None if rest.len() > max_len => LineStatus::TooLong,
        None => LineStatus::Incomplete,
    }
}

/// Length of the CR/LF run some clients send ahead of the request line.
fn leading_blank_len(buf: &[u8]) -> usize {
    buf.iter().position(|&b| b != b'\r' && b != b'\n').unwrap_or(buf.len())
}

/// Parse a request line from the bytes received on a connection.
///
/// Bytes are decoded one per character (ISO-8859-1), so no input is ever
/// rejected for its encoding. Leading blank lines are skipped and
/// everything after the request line is ignored.
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    let input = &input[leading_blank_len(input)..];
    let line_end = input.iter().position(|&b| b == b'\n').unwrap_or(input.len());
    let line: String = input[..line_end].iter().map(|&b| char::from(b)).collect();
    let line = line.trim_end_matches(['\r', '\n']);

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let method_token = match tokens.first() {
        Some(token) => *token,
        None => return Err(Error::EmptyRequest),
    };

    let method = match Method::from_token(method_token) {
        Method::Unsupported => return Err(Error::UnsupportedMethod(method_token.to_string())),
        method => method,
    };

    let version = match tokens.len() {
        2 => HttpVersion::Http09,
        3 => HttpVersion::from_str(tokens[2])?,
        _ => return Err(Error::MalformedRequestLine(line.to_string())),
    };

    Ok(HttpRequest::new(method, tokens[1], version))
}
