//! The connection multiplexer and the HTTP layer it drives.
//!
//! [`TcpServer`] owns the sockets and the readiness loop, [`HttpDispatcher`]
//! is the protocol callback, and [`HttpServer`] combines both with a
//! filesystem-backed resource handler.

mod response;
mod config;
mod error;
mod queue;
mod multiplexer;
mod dispatcher;
mod http_server;

// Re-export public items
pub use response::{HttpResponse, StatusCode};
pub use config::ServerConfig;
pub use error::Error;
pub use queue::OutboundQueue;
pub use multiplexer::{DataHandler, Flow, TcpServer};
pub use dispatcher::HttpDispatcher;
pub use http_server::{FileDispatcher, HttpServer};

pub use mio::Token;
