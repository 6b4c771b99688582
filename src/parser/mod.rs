//! HTTP/1.0 request-line parser.
//!
//! Only the first line of a request is inspected: the method token, the
//! request target and an optional version token. Header lines that follow
//! are read off the wire but never interpreted.

mod request;
mod method;
mod version;
mod error;

// Re-export public items
pub use request::HttpRequest;
pub use method::Method;
pub use version::HttpVersion;
pub use error::Error;

// Re-export the parsing functions
pub use request::{parse_request, request_line_status, LineStatus};
