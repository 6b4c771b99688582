//! HTTP request methods.

use std::fmt;

/// Request methods, as a fixed dispatch table.
///
/// Method tokens are case sensitive: `get` is [`Method::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method: transfers the status line, headers and the file content.
    GET,
    /// HEAD method: same as GET but without the body.
    HEAD,
    /// Any other token.
    Unsupported,
}

impl Method {
    /// Maps a request-line token onto a method.
    pub fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            _ => Method::Unsupported,
        }
    }

    /// Returns whether the response to this method carries a body.
    pub fn has_body(self) -> bool {
        matches!(self, Method::GET)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
