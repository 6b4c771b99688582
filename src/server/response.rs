//! HTTP/1.0 response framing.

/// Status codes the server produces, with their standard reason phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,
    BadRequest = 400,
    NotFound = 404,
    MethodNotAllowed = 405,
    RequestUriTooLong = 414,
    InternalServerError = 500,
}

impl StatusCode {
    /// Get the reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "File not found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::RequestUriTooLong => "Request-URI Too Long",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    /// The numeric code.
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

/// An HTTP/1.0 response: status line, ordered headers and a body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// The HTTP status code
    pub status: StatusCode,
    /// The text after the code in the status line
    pub reason: String,
    /// The headers, in the order they are written
    pub headers: Vec<(String, String)>,
    /// The response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new response carrying a `Server` header.
    pub fn new(status: StatusCode, server_name: &str) -> Self {
        Self {
            status,
            reason: status.reason_phrase().to_string(),
            headers: vec![("Server".to_string(), server_name.to_string())],
            body: Vec::new(),
        }
    }

    /// Create a body-less error response that announces the connection close.
    pub fn error(status: StatusCode, reason: impl Into<String>, server_name: &str) -> Self {
        Self::new(status, server_name)
            .with_reason(reason)
            .with_header("Connection", "close")
    }

    /// Replace the text after the status code.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Add or replace a header, keeping its original position on replace.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    /// Set the content type.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("Content-type", content_type)
    }

    /// Set the content length without attaching a body, as HEAD needs.
    pub fn with_content_length(self, len: u64) -> Self {
        self.with_header("Content-length", len.to_string())
    }

    /// Set the response body and its content length.
    pub fn with_body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        let content_length = self.body.len() as u64;
        self.with_content_length(content_length)
    }

    /// The status line, each header line and the blank separator line,
    /// every one terminated by CRLF.
    pub fn header_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.headers.len() + 2);
        lines.push(format!("HTTP/1.0 {} {}\r\n", self.status.as_u16(), self.reason));
        for (name, value) in &self.headers {
            lines.push(format!("{name}: {value}\r\n"));
        }
        lines.push("\r\n".to_string());
        lines
    }

    /// Convert the response to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for line in self.header_lines() {
            bytes.extend_from_slice(line.as_bytes());
        }
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_reason_phrase() {
        assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
        assert_eq!(StatusCode::NotFound.reason_phrase(), "File not found");
        assert_eq!(StatusCode::InternalServerError.reason_phrase(), "Internal Server Error");
        assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    }

    #[test]
    fn test_http_response_creation() {
        let response = HttpResponse::new(StatusCode::Ok, "test/1.0");
        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(response.headers, vec![("Server".to_string(), "test/1.0".to_string())]);
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_error_response_bytes() {
        let response = HttpResponse::error(StatusCode::MethodNotAllowed, "Not a supported method", "test/1.0");
        assert_eq!(
            response.to_bytes(),
            b"HTTP/1.0 405 Not a supported method\r\nServer: test/1.0\r\nConnection: close\r\n\r\n".to_vec()
        );
    }

    #[test]
    fn test_header_replacement_keeps_order() {
        let response = HttpResponse::new(StatusCode::Ok, "a")
            .with_content_type("text/plain")
            .with_header("Server", "b");
        assert_eq!(response.headers[0], ("Server".to_string(), "b".to_string()));
        assert_eq!(response.headers[1].0, "Content-type");
    }

    #[test]
    fn test_header_lines_with_body() {
        let response = HttpResponse::new(StatusCode::Ok, "test/1.0")
            .with_content_type("text/plain")
            .with_body_bytes(b"Hello, world!".to_vec());

        assert_eq!(
            response.header_lines(),
            vec![
                "HTTP/1.0 200 OK\r\n",
                "Server: test/1.0\r\n",
                "Content-type: text/plain\r\n",
                "Content-length: 13\r\n",
                "\r\n",
            ]
        );
        let bytes = response.to_bytes();
        assert!(bytes.ends_with(b"\r\n\r\nHello, world!"));
    }

    #[test]
    fn test_content_length_without_body() {
        let response = HttpResponse::new(StatusCode::Ok, "x").with_content_length(42);
        assert!(response.body.is_empty());
        assert!(String::from_utf8_lossy(&response.to_bytes()).contains("Content-length: 42\r\n"));
    }
}
