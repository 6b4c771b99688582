//! Static files served from a root directory.

use std::fs;
use std::io;
use std::path::PathBuf;

use log::debug;

use crate::handler::decode::{percent_decode, strip_query_and_fragment};
use crate::handler::mime::guess_content_type;
use crate::handler::{Outcome, ResourceHandler};
use crate::parser::Method;
use crate::server::{HttpResponse, StatusCode};

const INDEX_FILE: &str = "index.html";

/// Serves GET and HEAD requests from the files below `root`.
#[derive(Debug, Clone)]
pub struct FileSystemHandler {
    root: PathBuf,
    server_name: String,
}

impl FileSystemHandler {
    /// Create a handler for the tree below `root`.
    pub fn new(root: impl Into<PathBuf>, server_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            server_name: server_name.into(),
        }
    }

    /// Map a request target onto a path below the root.
    ///
    /// Empty, `.` and `..` segments are dropped, so the result never leaves
    /// the root.
    pub fn resolve(&self, target: &str) -> PathBuf {
        let decoded = percent_decode(strip_query_and_fragment(target));
        let mut path = self.root.clone();
        for segment in decoded.split('/') {
            match segment {
                "" | "." | ".." => {}
                segment => path.push(segment),
            }
        }
        path
    }

    fn serve(&self, method: Method, target: &str) -> io::Result<Outcome> {
        let mut path = self.resolve(target);
        let mut metadata = fs::metadata(&path)?;
        if metadata.is_dir() {
            path.push(INDEX_FILE);
            metadata = fs::metadata(&path)?;
        }
        if !metadata.is_file() {
            return Ok(Outcome::NotFound);
        }

        let (content_length, body) = if method.has_body() {
            let body = fs::read(&path)?;
            (body.len() as u64, body)
        } else {
            (metadata.len(), Vec::new())
        };
        debug!("Resolved {target} to {path}", path = path.display());

        let response = HttpResponse::new(StatusCode::Ok, &self.server_name)
            .with_content_type(guess_content_type(&path))
            .with_content_length(content_length);
        Ok(Outcome::Success {
            headers: response.header_lines(),
            body,
        })
    }
}

impl ResourceHandler for FileSystemHandler {
    fn handle(&self, method: Method, target: &str) -> Outcome {
        match self.serve(method, target) {
            Ok(outcome) => outcome,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Outcome::NotFound,
            Err(e) => Outcome::Failure(e),
        }
    }
}
