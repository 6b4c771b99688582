//! Server configuration.

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::server::error::Error;

/// Server configuration.
///
/// Every value is fixed at construction; the server never reloads it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The address to bind to.
    pub bind_address: IpAddr,
    /// The port to bind to.
    pub port: u16,
    /// The listen backlog.
    pub max_pending_connections: u32,
    /// The number of bytes requested by each read from a client.
    pub read_chunk_size: usize,
    /// The longest request line accepted before answering 414.
    pub max_request_line: usize,
    /// How many times the write phase may find a connection's queue empty
    /// before the connection is closed.
    pub max_empty_write_attempts: usize,
    /// The directory static files are served from.
    pub root_directory: PathBuf,
    /// The value of the `Server` response header.
    pub server_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8000,
            max_pending_connections: 5,
            read_chunk_size: 65536,
            max_request_line: 65536,
            max_empty_write_attempts: 1,
            root_directory: PathBuf::from("."),
            server_name: concat!("pollserve-rs/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ServerConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let json = fs::read_to_string(path.as_ref()).map_err(Error::Config)?;
        Self::from_json_str(&json)
    }

    /// Check that the values can drive a server.
    pub fn validate(&self) -> Result<(), Error> {
        if self.read_chunk_size == 0 {
            return Err(Error::InvalidConfig("read_chunk_size must be positive".to_string()));
        }
        if self.max_request_line == 0 {
            return Err(Error::InvalidConfig("max_request_line must be positive".to_string()));
        }
        if self.max_empty_write_attempts == 0 {
            return Err(Error::InvalidConfig(
                "max_empty_write_attempts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The socket address the listener binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    /// Set the bind address and port.
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr.ip();
        self.port = addr.port();
        self
    }

    /// Set the directory files are served from.
    pub fn with_root_directory(mut self, root: impl Into<PathBuf>) -> Self {
        self.root_directory = root.into();
        self
    }

    /// Set the read chunk size.
    pub fn with_read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size;
        self
    }

    /// Set the maximum request line length.
    pub fn with_max_request_line(mut self, len: usize) -> Self {
        self.max_request_line = len;
        self
    }

    /// Set the server identification string.
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr(), "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_pending_connections, 5);
        assert_eq!(config.read_chunk_size, 65536);
        assert!(config.server_name.starts_with("pollserve-rs/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = ServerConfig::from_json_str(
            r#"{"bind_address": "0.0.0.0", "port": 9090, "root_directory": "/srv/www"}"#,
        )
        .unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:9090".parse::<SocketAddr>().unwrap());
        assert_eq!(config.root_directory, PathBuf::from("/srv/www"));
        assert_eq!(config.max_request_line, 65536);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(ServerConfig::from_json_str("{port: 1"), Err(Error::JsonError(_))));
        assert!(matches!(
            ServerConfig::from_json_str(r#"{"read_chunk_size": 0}"#),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.json");
        fs::write(&path, r#"{"server_name": "files/2.0", "max_empty_write_attempts": 3}"#).unwrap();
        let config = ServerConfig::from_json_file(&path).unwrap();
        assert_eq!(config.server_name, "files/2.0");
        assert_eq!(config.max_empty_write_attempts, 3);

        let missing = ServerConfig::from_json_file(dir.path().join("absent.json"));
        assert!(matches!(missing, Err(Error::Config(_))));
    }

    #[test]
    fn test_builders() {
        let config = ServerConfig::default()
            .with_addr("10.0.0.1:81".parse().unwrap())
            .with_root_directory("/tmp")
            .with_read_chunk_size(512)
            .with_max_request_line(128)
            .with_server_name("x");
        assert_eq!(config.port, 81);
        assert_eq!(config.read_chunk_size, 512);
        assert_eq!(config.max_request_line, 128);
        assert_eq!(config.server_name, "x");
    }
}
