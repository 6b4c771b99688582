//! A raw multiplexer demo: every chunk a client sends comes back reversed,
//! then the connection is closed.
//!
//! Try it with `printf 'hello' | nc 127.0.0.1 8000`.

use log::info;
use pollserve_rs::{Flow, OutboundQueue, ServerConfig, TcpServer};

fn reverse(queue: &mut OutboundQueue, data: &[u8]) -> Flow {
    info!("Received {data:?}", data = String::from_utf8_lossy(data));
    queue.push(data.iter().rev().copied().collect::<Vec<u8>>());
    Flow::Complete
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut server = TcpServer::new(ServerConfig::default(), reverse);
    server.start()?;
    server.run()?;
    Ok(())
}
