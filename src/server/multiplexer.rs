//! Single-threaded readiness loop over one listening socket and its
//! accepted connections.
//!
//! Each iteration blocks in exactly one place, the readiness query, then
//! runs three phases to completion: reads (accepts included), writes and
//! error cleanup. Every connection lives in a registry owned by the loop;
//! a [`DataHandler`] only ever sees the outbound queue of the connection it
//! was invoked for.
//!
//! The OS backends behind `mio` report readiness edge-triggered. A socket
//! that may still have something pending after its single accept or its
//! single bounded read is carried over and treated as ready again on the
//! next iteration, which then polls without blocking.

use std::collections::{HashMap, HashSet};
use std::io::{self, Read, Write};
use std::net::SocketAddr;
use std::time::Duration;

use log::{debug, error, info, warn};
use mio::net::{TcpListener, TcpStream};
use mio::{Events, Interest, Poll, Token};
use socket2::{Domain, Protocol, Socket, Type};

use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::queue::OutboundQueue;

const LISTENER: Token = Token(0);
const EVENT_CAPACITY: usize = 1024;

/// What a handler made of the bytes buffered for a connection so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// The exchange is finished; the connection moves on to writing.
    Complete,
    /// More bytes are needed; they are appended to the same buffer and the
    /// handler is invoked again once they arrive.
    Incomplete,
}

/// The protocol callback driven by [`TcpServer`].
///
/// Runs synchronously inside the loop, so it must not block.
pub trait DataHandler {
    /// Handle the bytes received on one connection, queueing any reply.
    fn on_data(&mut self, queue: &mut OutboundQueue, data: &[u8]) -> Flow;
}

impl<F> DataHandler for F
where
    F: FnMut(&mut OutboundQueue, &[u8]) -> Flow,
{
    fn on_data(&mut self, queue: &mut OutboundQueue, data: &[u8]) -> Flow {
        self(queue, data)
    }
}

/// One accepted client socket.
struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    inbound: Vec<u8>,
    queue: OutboundQueue,
    /// A payload that hit `WouldBlock`, with the offset written so far.
    in_flight: Option<(Vec<u8>, usize)>,
    write_scheduled: bool,
    empty_writes: usize,
    /// An empty read arrived while a response was still pending.
    peer_closed: bool,
    /// The peer's FIN was reported; reads continue until one returns 0.
    read_closed: bool,
}

impl Connection {
    fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self {
            stream,
            peer,
            inbound: Vec::new(),
            queue: OutboundQueue::new(),
            in_flight: None,
            write_scheduled: false,
            empty_writes: 0,
            peer_closed: false,
            read_closed: false,
        }
    }
}

enum WriteProgress {
    Done,
    Blocked(usize),
}

/// A non-blocking TCP server multiplexing all connections on one thread.
pub struct TcpServer<H> {
    config: ServerConfig,
    handler: H,
    poll: Option<Poll>,
    listener: Option<TcpListener>,
    events: Events,
    connections: HashMap<Token, Connection>,
    carried: HashSet<Token>,
    next_token: usize,
    read_buf: Vec<u8>,
}

impl<H: DataHandler> TcpServer<H> {
    /// Store the configuration and callback. Does not touch the network.
    pub fn new(config: ServerConfig, handler: H) -> Self {
        let read_buf = vec![0; config.read_chunk_size];
        Self {
            config,
            handler,
            poll: None,
            listener: None,
            events: Events::with_capacity(EVENT_CAPACITY),
            connections: HashMap::new(),
            carried: HashSet::new(),
            next_token: LISTENER.0 + 1,
            read_buf,
        }
    }

    /// The server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Create, bind and register the listening socket.
    pub fn start(&mut self) -> Result<(), Error> {
        self.config.validate()?;
        let addr = self.config.socket_addr();
        let mut listener = bind_listener(addr, self.config.max_pending_connections)
            .map_err(|source| Error::Bind { addr, source })?;

        let poll = Poll::new()?;
        poll.registry()
            .register(&mut listener, LISTENER, Interest::READABLE)?;

        info!(
            "Listening on {addr} (backlog {backlog})",
            addr = listener.local_addr()?,
            backlog = self.config.max_pending_connections
        );
        self.listener = Some(listener);
        self.poll = Some(poll);
        Ok(())
    }

    /// Run the event loop. Only returns with a fatal error.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            self.run_once(None)?;
        }
    }

    /// Run a single iteration of the event loop.
    ///
    /// Blocks for at most `timeout` (forever with `None`) waiting for
    /// readiness, then processes everything that became ready.
    pub fn run_once(&mut self, timeout: Option<Duration>) -> Result<(), Error> {
        let poll = self.poll.as_mut().ok_or(Error::NotStarted)?;
        let timeout = if self.carried.is_empty() {
            timeout
        } else {
            Some(Duration::ZERO)
        };

        if let Err(e) = poll.poll(&mut self.events, timeout) {
            if e.kind() == io::ErrorKind::Interrupted {
                return Ok(());
            }
            error!("Readiness query failed: {e}");
            return Err(Error::FatalIo(e));
        }

        let mut readable: Vec<Token> = self.carried.drain().collect();
        let mut writable = Vec::new();
        let mut failed = Vec::new();
        for event in self.events.iter() {
            let token = event.token();
            if event.is_read_closed() {
                if let Some(conn) = self.connections.get_mut(&token) {
                    conn.read_closed = true;
                }
            }
            if (event.is_readable() || event.is_read_closed()) && !readable.contains(&token) {
                readable.push(token);
            }
            if event.is_writable() {
                writable.push(token);
            }
            if event.is_error() {
                failed.push(token);
            }
        }

        for token in readable {
            if token == LISTENER {
                self.accept_one()?;
            } else {
                self.read_client(token);
            }
        }

        for token in writable {
            if token != LISTENER {
                self.write_client(token);
            }
        }

        for token in failed {
            if token == LISTENER {
                error!("Listening socket reported an error condition");
                return Err(Error::ListenerFailed);
            }
            if self.close_connection(token) {
                debug!("Closed connection {token:?} after an error condition");
            }
        }

        Ok(())
    }

    /// The address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        let listener = self.listener.as_ref().ok_or(Error::NotStarted)?;
        Ok(listener.local_addr()?)
    }

    /// The number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// The tokens of all live connections.
    pub fn connections(&self) -> Vec<Token> {
        self.connections.keys().copied().collect()
    }

    /// Returns whether `token` names a live connection.
    pub fn is_registered(&self, token: Token) -> bool {
        self.connections.contains_key(&token)
    }

    /// Returns whether `token` is waiting for write readiness.
    pub fn is_write_scheduled(&self, token: Token) -> bool {
        self.connections
            .get(&token)
            .is_some_and(|conn| conn.write_scheduled)
    }

    /// Close a connection, deregister it and drop its queue.
    ///
    /// Returns `false` if the connection was already gone.
    pub fn close_connection(&mut self, token: Token) -> bool {
        let mut conn = match self.connections.remove(&token) {
            Some(conn) => conn,
            None => return false,
        };
        self.carried.remove(&token);
        if let Some(poll) = self.poll.as_ref() {
            if let Err(e) = poll.registry().deregister(&mut conn.stream) {
                debug!("Deregistering {peer} failed: {e}", peer = conn.peer);
            }
        }
        debug!("Closed connection from {peer}", peer = conn.peer);
        true
    }

    /// Accept at most one pending connection.
    fn accept_one(&mut self) -> Result<(), Error> {
        let listener = self.listener.as_ref().ok_or(Error::NotStarted)?;
        let (mut stream, peer) = match listener.accept() {
            Ok(accepted) => accepted,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::ConnectionAborted
                        | io::ErrorKind::ConnectionReset
                        | io::ErrorKind::Interrupted
                ) =>
            {
                warn!("Error accepting connection: {e}");
                self.carried.insert(LISTENER);
                return Ok(());
            }
            Err(e) => {
                error!("Listening socket failed: {e}");
                return Err(Error::FatalIo(e));
            }
        };

        // More connections may be waiting in the backlog.
        self.carried.insert(LISTENER);

        let poll = self.poll.as_ref().ok_or(Error::NotStarted)?;
        let token = Token(self.next_token);
        if let Err(e) = poll.registry().register(&mut stream, token, Interest::READABLE) {
            warn!("Could not register connection from {peer}: {e}");
            return Ok(());
        }
        self.next_token += 1;
        debug!("Accepted connection from {peer} as {token:?}");
        self.connections.insert(token, Connection::new(stream, peer));
        Ok(())
    }

    /// Perform one bounded read and hand the buffered bytes to the handler.
    fn read_client(&mut self, token: Token) {
        let chunk = self.config.read_chunk_size;
        let conn = match self.connections.get_mut(&token) {
            Some(conn) => conn,
            None => return,
        };

        let n = match conn.stream.read(&mut self.read_buf[..chunk]) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                self.carried.insert(token);
                return;
            }
            Err(e) => {
                warn!("Error reading from {peer}: {e}", peer = conn.peer);
                self.close_connection(token);
                return;
            }
        };

        if n == 0 {
            if conn.write_scheduled || conn.in_flight.is_some() {
                // Half-closed: the response still goes out.
                debug!("{peer} closed its side, response pending", peer = conn.peer);
                conn.peer_closed = true;
            } else {
                self.close_connection(token);
            }
            return;
        }

        // No further edge follows a FIN that arrived with this data.
        if n == chunk || conn.read_closed {
            self.carried.insert(token);
        }

        if conn.write_scheduled {
            debug!("Discarding {n} bytes from {peer} awaiting its response", peer = conn.peer);
            return;
        }

        conn.inbound.extend_from_slice(&self.read_buf[..n]);
        match self.handler.on_data(&mut conn.queue, &conn.inbound) {
            Flow::Incomplete => return,
            Flow::Complete => conn.inbound.clear(),
        }
        self.set_write_interest(token, true);
    }

    /// Send the connection's payload; close once it is fully written.
    fn write_client(&mut self, token: Token) {
        let max_empty_writes = self.config.max_empty_write_attempts;
        let conn = match self.connections.get_mut(&token) {
            Some(conn) => conn,
            None => return,
        };
        if !conn.write_scheduled {
            return;
        }

        let (payload, offset) = match conn.in_flight.take() {
            Some(in_flight) => in_flight,
            None => match conn.queue.pop() {
                Some(payload) => (payload, 0),
                None => {
                    conn.empty_writes += 1;
                    if conn.peer_closed || conn.empty_writes >= max_empty_writes {
                        debug!(
                            "Closing idle connection from {peer} after {count} empty writes",
                            peer = conn.peer,
                            count = conn.empty_writes
                        );
                        self.close_connection(token);
                    } else {
                        self.set_write_interest(token, false);
                    }
                    return;
                }
            },
        };

        match write_payload(&mut conn.stream, &payload, offset) {
            Ok(WriteProgress::Done) => {
                debug!("Wrote {len} bytes to {peer}", len = payload.len(), peer = conn.peer);
                self.close_connection(token);
            }
            Ok(WriteProgress::Blocked(written)) => {
                conn.in_flight = Some((payload, written));
            }
            Err(e) => {
                warn!("Error writing to {peer}: {e}", peer = conn.peer);
                self.close_connection(token);
            }
        }
    }

    /// Add or drop write interest for a connection.
    fn set_write_interest(&mut self, token: Token, enabled: bool) {
        let poll = match self.poll.as_ref() {
            Some(poll) => poll,
            None => return,
        };
        let conn = match self.connections.get_mut(&token) {
            Some(conn) => conn,
            None => return,
        };
        let interest = if enabled {
            Interest::READABLE | Interest::WRITABLE
        } else {
            Interest::READABLE
        };
        match poll.registry().reregister(&mut conn.stream, token, interest) {
            Ok(()) => conn.write_scheduled = enabled,
            Err(e) => {
                warn!("Could not update interest for {peer}: {e}", peer = conn.peer);
                self.close_connection(token);
            }
        }
    }
}

/// Write `payload[offset..]` until it is done or the socket would block.
fn write_payload(stream: &mut impl Write, payload: &[u8], mut offset: usize) -> io::Result<WriteProgress> {
    while offset < payload.len() {
        match stream.write(&payload[offset..]) {
            Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
            Ok(n) => offset += n,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                return Ok(WriteProgress::Blocked(offset));
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(WriteProgress::Done)
}

/// Create a non-blocking listener with an explicit backlog.
fn bind_listener(addr: SocketAddr, backlog: u32) -> io::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(i32::try_from(backlog).unwrap_or(i32::MAX))?;
    Ok(TcpListener::from_std(socket.into()))
}
