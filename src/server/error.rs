//! Error types for the server.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Errors that stop the server, at startup or inside the event loop.
///
/// Errors on a single client connection never surface here; the loop
/// closes that connection and carries on.
#[derive(Debug, Error)]
pub enum Error {
    /// The listening socket could not be set up on the requested address.
    #[error("Could not bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The readiness query or the listening socket failed.
    #[error("Fatal I/O error: {0}")]
    FatalIo(#[from] io::Error),

    /// The listening socket reported an error condition.
    #[error("Listening socket reported an error condition")]
    ListenerFailed,

    /// `run` was called before `start`.
    #[error("Server has not been started")]
    NotStarted,

    /// The configuration file could not be read.
    #[error("Could not read configuration: {0}")]
    Config(#[source] io::Error),

    /// The configuration file is not valid JSON.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The configuration holds a value the server cannot run with.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
