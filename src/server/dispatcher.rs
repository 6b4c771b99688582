//! The HTTP/1.0 adapter the multiplexer drives.

use log::{debug, error, info};

use crate::handler::{Outcome, ResourceHandler};
use crate::parser::{parse_request, request_line_status, Error as ParserError, LineStatus};
use crate::server::multiplexer::{DataHandler, Flow};
use crate::server::queue::OutboundQueue;
use crate::server::response::{HttpResponse, StatusCode};

/// Turns the bytes of one request into one queued response.
///
/// Holds no per-request state: everything built for an exchange is dropped
/// once its response is queued.
pub struct HttpDispatcher<R> {
    resources: R,
    server_name: String,
    max_request_line: usize,
}

impl<R: ResourceHandler> HttpDispatcher<R> {
    /// Create a dispatcher serving from `resources`.
    pub fn new(resources: R, server_name: impl Into<String>, max_request_line: usize) -> Self {
        Self {
            resources,
            server_name: server_name.into(),
            max_request_line,
        }
    }

    /// Build the response for a request whose first line is complete.
    pub fn respond(&self, raw: &[u8]) -> (StatusCode, Vec<u8>) {
        let request = match parse_request(raw) {
            Ok(request) => request,
            Err(err) => return self.reject(raw, &err),
        };

        // Only GET and HEAD survive parsing.
        let (status, payload) = match self.resources.handle(request.method, &request.target) {
            Outcome::Success { headers, body } => {
                let mut payload: Vec<u8> = headers.concat().into_bytes();
                payload.extend_from_slice(&body);
                (StatusCode::Ok, payload)
            }
            Outcome::NotFound => self.error_response(StatusCode::NotFound, StatusCode::NotFound.reason_phrase()),
            Outcome::Failure(cause) => {
                error!("Failed to serve {target}: {cause}", target = request.target);
                self.error_response(
                    StatusCode::InternalServerError,
                    StatusCode::InternalServerError.reason_phrase(),
                )
            }
        };

        info!("{}", summarize(&request.method.to_string(), request.path(), status));
        (status, payload)
    }

    /// Build the error response for a request that failed to parse.
    fn reject(&self, raw: &[u8], err: &ParserError) -> (StatusCode, Vec<u8>) {
        debug!("Rejected request: {err}");
        info!("{}", summarize_rejected(raw, self.max_request_line, err.status()));
        self.error_response(err.status(), err.status_text())
    }

    fn error_response(&self, status: StatusCode, reason: &str) -> (StatusCode, Vec<u8>) {
        let response = HttpResponse::error(status, reason, &self.server_name);
        (status, response.to_bytes())
    }
}

/// The log line for one exchange: `<method> <path> <code>`.
fn summarize(method: &str, path: &str, status: StatusCode) -> String {
    format!("{method} {path} {code}", code = status.as_u16())
}

/// Like [`summarize`], from the raw tokens of a line that failed to parse.
fn summarize_rejected(raw: &[u8], max_len: usize, status: StatusCode) -> String {
    let line: String = raw
        .iter()
        .skip_while(|&&b| b == b'\r' || b == b'\n')
        .take_while(|&&b| b != b'\n')
        .take(max_len)
        .map(|&b| char::from(b))
        .collect();
    let mut tokens = line.split_whitespace();
    let method = tokens.next().unwrap_or("-");
    let path = tokens
        .next()
        .and_then(|target| target.split(['?', '#']).next())
        .unwrap_or("-");
    summarize(method, path, status)
}

impl<R: ResourceHandler> DataHandler for HttpDispatcher<R> {
    fn on_data(&mut self, queue: &mut OutboundQueue, data: &[u8]) -> Flow {
        match request_line_status(data, self.max_request_line) {
            LineStatus::Incomplete => Flow::Incomplete,
            LineStatus::TooLong => {
                let err = ParserError::RequestLineTooLong(self.max_request_line);
                let (_, payload) = self.reject(data, &err);
                queue.push(payload);
                Flow::Complete
            }
            LineStatus::Complete(_) => {
                let (_, payload) = self.respond(data);
                queue.push(payload);
                Flow::Complete
            }
        }
    }
}
