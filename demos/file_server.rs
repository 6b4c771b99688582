//! Serves a directory over HTTP/1.0.
//!
//! Usage: `cargo run --example file_server -- [--config FILE] [DIRECTORY]`
//!
//! Without a directory the current working directory is served.

use std::env;

use log::{error, info};
use pollserve_rs::{HttpServer, ServerConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = ServerConfig::default();
    let mut directory = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config needs a file name")?;
                config = ServerConfig::from_json_file(path)?;
            }
            _ => directory = Some(arg),
        }
    }
    if let Some(directory) = directory {
        config = config.with_root_directory(directory);
    }

    info!("Starting on http://{addr}/", addr = config.socket_addr());
    let mut server = HttpServer::new(config);
    server.start()?;
    if let Err(e) = server.run() {
        error!("Server stopped: {e}");
        return Err(e.into());
    }
    Ok(())
}
