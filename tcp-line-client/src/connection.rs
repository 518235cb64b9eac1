//! The single owned connection to the remote endpoint.
//!
//! A [`Connection`] is created by an active open ([`Connection::open`]) or by
//! wrapping an already-connected [`Transport`].  Its responsibilities are:
//! - Writing one newline-terminated request per call to [`Connection::send_line`].
//! - Reading one bounded chunk per call to [`Connection::receive_chunk`],
//!   telling a clean peer close apart from an I/O fault.
//! - Releasing the stream exactly once, on [`Connection::close`] or on drop.
//!
//! Every call blocks.  There are no timeouts.

use std::io::ErrorKind;
use std::net::TcpStream;

use crate::endpoint::Endpoint;
use crate::error::ConnectionError;
use crate::transport::Transport;

/// Contract size of one receive call.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Bytes returned by one receive call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    bytes: Vec<u8>,
    filled_chunk: bool,
}

impl Response {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `true` when the read used the whole chunk, so more bytes may be
    /// waiting in the stream.
    pub fn filled_chunk(&self) -> bool {
        self.filled_chunk
    }

    /// Display form: lossy UTF-8 with surrounding whitespace stripped.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).trim().to_string()
    }
}

/// Outcome of [`Connection::receive_chunk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Chunk(Response),
    /// The peer closed its side before sending any bytes.
    PeerClosed,
}

pub struct Connection<T: Transport = TcpStream> {
    peer: String,
    stream: Option<T>,
    buf: Vec<u8>,
}

impl Connection<TcpStream> {
    /// Resolve `endpoint` and connect to the first address that accepts.
    pub fn open(endpoint: &Endpoint, max_chunk: usize) -> Result<Self, ConnectionError> {
        let addrs = endpoint.resolve().map_err(|source| ConnectionError::Resolve {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let mut last_err = None;
        for addr in addrs {
            log::debug!("connecting to {addr}");
            match TcpStream::connect(addr) {
                Ok(stream) => {
                    log::info!("connected to {endpoint} ({addr})");
                    return Ok(Self::from_transport(endpoint.to_string(), stream, max_chunk));
                }
                Err(e) => {
                    log::debug!("connect to {addr} failed: {e}");
                    last_err = Some(e);
                }
            }
        }

        Err(match last_err {
            Some(source) => ConnectionError::Connect {
                endpoint: endpoint.to_string(),
                source,
            },
            None => ConnectionError::NoAddresses {
                endpoint: endpoint.to_string(),
            },
        })
    }
}

impl<T: Transport> Connection<T> {
    /// Wrap an already-connected stream.  `max_chunk` is clamped to at least 1.
    pub fn from_transport(peer: impl Into<String>, stream: T, max_chunk: usize) -> Self {
        Self {
            peer: peer.into(),
            stream: Some(stream),
            buf: vec![0u8; max_chunk.max(1)],
        }
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn max_chunk(&self) -> usize {
        self.buf.len()
    }

    /// Write `line` plus one `\n` in full.  Returns the number of bytes sent.
    pub fn send_line(&mut self, line: &str) -> Result<usize, ConnectionError> {
        let peer = &self.peer;
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| ConnectionError::Closed { peer: peer.clone() })?;

        let mut request = Vec::with_capacity(line.len() + 1);
        request.extend_from_slice(line.as_bytes());
        request.push(b'\n');

        stream
            .write_all(&request)
            .and_then(|()| stream.flush())
            .map_err(|source| ConnectionError::Send {
                peer: peer.clone(),
                source,
            })?;

        log::debug!("→ {} bytes to {peer}", request.len());
        Ok(request.len())
    }

    /// One blocking read of at most [`Connection::max_chunk`] bytes.
    pub fn receive_chunk(&mut self) -> Result<Received, ConnectionError> {
        let peer = &self.peer;
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| ConnectionError::Closed { peer: peer.clone() })?;

        let n = loop {
            match stream.read(&mut self.buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(ConnectionError::Receive {
                        peer: peer.clone(),
                        source,
                    })
                }
            }
        };

        if n == 0 {
            log::debug!("← EOF from {peer}");
            return Ok(Received::PeerClosed);
        }

        log::debug!("← {n} bytes from {peer}");
        Ok(Received::Chunk(Response {
            bytes: self.buf[..n].to_vec(),
            filled_chunk: n == self.buf.len(),
        }))
    }

    /// Shut down and drop the stream.  Idempotent.
    pub fn close(&mut self) {
        let Some(mut stream) = self.stream.take() else {
            return;
        };
        match stream.shutdown() {
            Ok(()) => log::debug!("closed connection to {}", self.peer),
            // The peer may already have torn the socket down.
            Err(e) if e.kind() == ErrorKind::NotConnected => {
                log::debug!("connection to {} already down", self.peer)
            }
            Err(e) => log::warn!("shutdown of {} failed: {e}", self.peer),
        }
    }
}

impl<T: Transport> Drop for Connection<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T: Transport> std::fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("peer", &self.peer)
            .field("open", &self.is_open())
            .field("max_chunk", &self.buf.len())
            .finish()
    }
}
