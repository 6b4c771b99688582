//! A single-threaded, readiness-driven HTTP/1.0 static file server.
//!
//! The crate is built in three layers:
//!
//! - [`TcpServer`], a non-blocking connection multiplexer: one listening
//!   socket, a registry of accepted connections and a readiness loop that
//!   reads, hands bytes to a [`DataHandler`] and writes back whatever the
//!   handler queued, one request per connection.
//! - [`HttpDispatcher`], the HTTP/1.0 adapter: parses the request line,
//!   dispatches GET and HEAD to a [`ResourceHandler`] and frames success or
//!   error responses.
//! - [`FileSystemHandler`], which maps request paths onto files below a
//!   root directory.
//!
//! [`HttpServer`] wires all three together.
//!
//! # Examples
//!
//! ## Serving a directory
//!
//! ```no_run
//! use pollserve_rs::{HttpServer, ServerConfig};
//!
//! let config = ServerConfig::default()
//!     .with_addr("127.0.0.1:8000".parse().unwrap())
//!     .with_root_directory("./public");
//!
//! let mut server = HttpServer::new(config);
//! server.start()?;
//! server.run()?;
//! # Ok::<(), pollserve_rs::ServerError>(())
//! ```
//!
//! ## A raw protocol callback
//!
//! ```no_run
//! use pollserve_rs::{Flow, OutboundQueue, ServerConfig, TcpServer};
//!
//! let echo = |queue: &mut OutboundQueue, data: &[u8]| {
//!     queue.push(data.to_vec());
//!     Flow::Complete
//! };
//!
//! let mut server = TcpServer::new(ServerConfig::default(), echo);
//! server.start()?;
//! server.run()?;
//! # Ok::<(), pollserve_rs::ServerError>(())
//! ```
//!
//! ## Parsing a request line
//!
//! ```
//! use pollserve_rs::{parse_request, Method, ParserError};
//!
//! let request = parse_request(b"GET /docs/index.html?lang=en HTTP/1.0\r\n\r\n").unwrap();
//! assert_eq!(request.method, Method::GET);
//! assert_eq!(request.path(), "/docs/index.html");
//!
//! let rejected = parse_request(b"POST /form HTTP/1.0\r\n\r\n");
//! assert!(matches!(rejected, Err(ParserError::UnsupportedMethod(_))));
//! ```

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Export the resource handler module
pub mod handler;

// Re-export commonly used items for convenience
pub use handler::{FileSystemHandler, Outcome, ResourceHandler};
pub use parser::{parse_request, Error as ParserError, HttpRequest, HttpVersion, Method};
pub use server::{
    DataHandler, Error as ServerError, Flow, HttpDispatcher, HttpResponse, HttpServer, OutboundQueue,
    ServerConfig, StatusCode, TcpServer,
};
