//! The static file server: multiplexer, HTTP dispatcher and file handler
//! wired together from one configuration.

use std::net::SocketAddr;
use std::time::Duration;

use log::info;

use crate::handler::FileSystemHandler;
use crate::server::config::ServerConfig;
use crate::server::dispatcher::HttpDispatcher;
use crate::server::error::Error;
use crate::server::multiplexer::TcpServer;

/// The dispatcher type an [`HttpServer`] runs.
pub type FileDispatcher = HttpDispatcher<FileSystemHandler>;

/// An HTTP/1.0 server for the files below a root directory.
pub struct HttpServer {
    inner: TcpServer<FileDispatcher>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let files = FileSystemHandler::new(config.root_directory.clone(), config.server_name.clone());
        let dispatcher = HttpDispatcher::new(files, config.server_name.clone(), config.max_request_line);
        Self {
            inner: TcpServer::new(config, dispatcher),
        }
    }

    /// The server configuration.
    pub fn config(&self) -> &ServerConfig {
        self.inner.config()
    }

    /// Bind the listening socket.
    pub fn start(&mut self) -> Result<(), Error> {
        self.inner.start()?;
        info!(
            "Serving {root} as {name}",
            root = self.config().root_directory.display(),
            name = self.config().server_name
        );
        Ok(())
    }

    /// Serve until a fatal error occurs.
    pub fn run(&mut self) -> Result<(), Error> {
        self.inner.run()
    }

    /// Run one iteration of the event loop.
    pub fn run_once(&mut self, timeout: Option<Duration>) -> Result<(), Error> {
        self.inner.run_once(timeout)
    }

    /// The address the server is listening on.
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        self.inner.local_addr()
    }

    /// The number of open client connections.
    pub fn connection_count(&self) -> usize {
        self.inner.connection_count()
    }
}
