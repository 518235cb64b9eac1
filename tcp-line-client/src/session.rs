//! The request/response exchange loop.
//!
//! A [`Session`] owns one [`Connection`] and alternates strictly between
//! sending one request line and receiving one response chunk:
//!
//! ```text
//!   LineSource ──line──▶ Session ──send_line──▶ remote
//!                           │                     │
//!   output ◀──text──────────┴◀──receive_chunk─────┘
//! ```
//!
//! The loop ends on the sentinel line, input exhaustion, a peer close, or a
//! fatal error.  The connection is released on every one of those paths.

use std::io::Write;
use std::net::TcpStream;

use crate::connection::{Connection, Received, DEFAULT_CHUNK_SIZE};
use crate::endpoint::Endpoint;
use crate::error::{ConnectionError, SessionError};
use crate::input::LineSource;
use crate::state::SessionState;
use crate::transport::Transport;

/// Line that ends the session without being sent.
pub const DEFAULT_SENTINEL: &str = "quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Upper bound on the bytes read per response.
    pub max_chunk: usize,
    /// Compared to each input line exactly, without trimming.
    pub sentinel: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_chunk: DEFAULT_CHUNK_SIZE,
            sentinel: DEFAULT_SENTINEL.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn with_max_chunk(mut self, max_chunk: usize) -> Self {
        self.max_chunk = max_chunk.max(1);
        self
    }

    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }
}

/// How a session ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The sentinel line was read.
    Sentinel,
    /// The line source ran dry.
    InputClosed,
    /// The peer closed the connection before answering.
    PeerClosed,
}

impl std::fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEnd::Sentinel => f.write_str("sentinel received"),
            SessionEnd::InputClosed => f.write_str("input closed"),
            SessionEnd::PeerClosed => f.write_str("connection closed by peer"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub lines_read: u64,
    pub requests_sent: u64,
    pub responses_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    /// Responses that filled the whole chunk.
    pub truncated_chunks: u64,
}

pub struct Session<T: Transport = TcpStream> {
    connection: Connection<T>,
    config: SessionConfig,
    state: SessionState,
    stats: SessionStats,
}

impl Session<TcpStream> {
    /// Connect to `endpoint`.  Failure is fatal; there is no retry.
    pub fn open(endpoint: &Endpoint, config: SessionConfig) -> Result<Self, ConnectionError> {
        match Connection::open(endpoint, config.max_chunk) {
            Ok(connection) => Ok(Self::with_connection(connection, config)),
            Err(e) => {
                log::debug!(
                    "session state {} -> {}",
                    SessionState::Disconnected,
                    SessionState::Closed
                );
                Err(e)
            }
        }
    }
}

impl<T: Transport> Session<T> {
    /// Start a session over an already-open connection.
    pub fn with_connection(connection: Connection<T>, config: SessionConfig) -> Self {
        let mut session = Self {
            connection,
            config,
            state: SessionState::Disconnected,
            stats: SessionStats::default(),
        };
        session.transition(SessionState::Connected);
        session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run the loop until it ends, writing each response's text to `output`.
    ///
    /// The connection is closed before this returns, whatever the outcome.
    pub fn run<L, W>(&mut self, input: &mut L, output: &mut W) -> Result<SessionEnd, SessionError>
    where
        L: LineSource + ?Sized,
        W: Write + ?Sized,
    {
        let outcome = self.exchange_loop(input, output);
        self.close();
        match &outcome {
            Ok(end) => log::info!("session with {} ended: {end}", self.connection.peer()),
            Err(e) => log::info!("session with {} failed: {e}", self.connection.peer()),
        }
        outcome
    }

    fn exchange_loop<L, W>(&mut self, input: &mut L, output: &mut W) -> Result<SessionEnd, SessionError>
    where
        L: LineSource + ?Sized,
        W: Write + ?Sized,
    {
        if self.state.is_terminal() {
            return Err(ConnectionError::Closed {
                peer: self.connection.peer().to_string(),
            }
            .into());
        }

        loop {
            let Some(line) = input.read_line().map_err(SessionError::Input)? else {
                return Ok(SessionEnd::InputClosed);
            };
            self.stats.lines_read += 1;

            if line == self.config.sentinel {
                return Ok(SessionEnd::Sentinel);
            }

            match self.exchange(&line)? {
                Received::Chunk(response) => {
                    writeln!(output, "{}", response.text())
                        .and_then(|()| output.flush())
                        .map_err(SessionError::Output)?;
                }
                Received::PeerClosed => return Ok(SessionEnd::PeerClosed),
            }
        }
    }

    /// Send one line and block for exactly one response chunk.
    ///
    /// Anything other than a received chunk (peer close or an error) closes
    /// the session.
    pub fn exchange(&mut self, line: &str) -> Result<Received, SessionError> {
        if self.state == SessionState::Connected {
            self.transition(SessionState::Exchanging);
        }

        let result = self.send_and_receive(line);
        if !matches!(result, Ok(Received::Chunk(_))) {
            self.close();
        }
        result
    }

    fn send_and_receive(&mut self, line: &str) -> Result<Received, SessionError> {
        let sent = self.connection.send_line(line)?;
        self.stats.requests_sent += 1;
        self.stats.bytes_sent += sent as u64;

        let received = self.connection.receive_chunk()?;
        if let Received::Chunk(response) = &received {
            self.stats.responses_received += 1;
            self.stats.bytes_received += response.bytes().len() as u64;
            if response.filled_chunk() {
                self.stats.truncated_chunks += 1;
                log::warn!(
                    "response from {} filled the {} byte chunk; the rest arrives with the next read",
                    self.connection.peer(),
                    self.connection.max_chunk()
                );
            }
        }
        Ok(received)
    }

    /// Release the connection and enter [`SessionState::Closed`].  Idempotent.
    pub fn close(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.connection.close();
        self.transition(SessionState::Closed);
        log::debug!("session stats: {:?}", self.stats);
    }

    fn transition(&mut self, next: SessionState) {
        if !self.state.can_transition_to(next) {
            log::error!("illegal session transition {} -> {next}", self.state);
            return;
        }
        log::debug!("session state {} -> {next}", self.state);
        self.state = next;
    }
}

/// Open a session to `endpoint` and run it to completion.
///
/// Nothing is read from `input` unless the connection succeeds.
pub fn connect_and_run<L, W>(
    endpoint: &Endpoint,
    config: SessionConfig,
    input: &mut L,
    output: &mut W,
) -> Result<SessionEnd, SessionError>
where
    L: LineSource + ?Sized,
    W: Write + ?Sized,
{
    let mut session = Session::open(endpoint, config)?;
    session.run(input, output)
}

impl<T: Transport> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("connection", &self.connection)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        self.close();
    }
}
