//! Resolution of request paths to response headers and bodies.
//!
//! The dispatcher only depends on [`ResourceHandler`]; [`FileSystemHandler`]
//! is the implementation that serves a directory tree.

mod decode;
mod fs;
mod mime;
mod tests;

use std::io;

use crate::parser::Method;

pub use decode::{percent_decode, strip_query_and_fragment};
pub use fs::FileSystemHandler;
pub use mime::guess_content_type;

/// The result of resolving one request.
#[derive(Debug)]
pub enum Outcome {
    /// The status line and header lines, each CRLF terminated and followed
    /// by the blank separator line, plus the body (empty for HEAD).
    Success { headers: Vec<String>, body: Vec<u8> },
    /// Nothing exists at the requested path.
    NotFound,
    /// Resolution failed for any other reason.
    Failure(io::Error),
}

/// Resolves a request target for a supported method.
pub trait ResourceHandler {
    /// Handle `target`, which is the raw request target and may still carry
    /// percent escapes, a query string or a fragment.
    fn handle(&self, method: Method, target: &str) -> Outcome;
}

impl<F> ResourceHandler for F
where
    F: Fn(Method, &str) -> Outcome,
{
    fn handle(&self, method: Method, target: &str) -> Outcome {
        self(method, target)
    }
}
