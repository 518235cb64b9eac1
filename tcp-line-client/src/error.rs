//! Error taxonomy for the client.
//!
//! Only fatal conditions live here.  The graceful ways a session can end
//! (sentinel typed, input exhausted, peer closed) are reported through
//! [`crate::session::SessionEnd`] instead.

use std::io;

use thiserror::Error;

/// A host/port pair that cannot name a remote endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("host must not be empty")]
    EmptyHost,
    #[error("invalid port '{0}': expected an integer")]
    InvalidPort(String),
    #[error("port {0} out of range: expected 1-65535")]
    PortOutOfRange(u32),
}

/// Any fault on the connection itself.  Always fatal to the session.
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("could not resolve {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    #[error("{endpoint} did not resolve to any address")]
    NoAddresses { endpoint: String },
    #[error("could not connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    #[error("send to {peer} failed: {source}")]
    Send {
        peer: String,
        #[source]
        source: io::Error,
    },
    #[error("receive from {peer} failed: {source}")]
    Receive {
        peer: String,
        #[source]
        source: io::Error,
    },
    #[error("connection to {peer} is closed")]
    Closed { peer: String },
}

/// Everything [`crate::session::Session::run`] can fail with.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error("failed to read input: {0}")]
    Input(#[source] io::Error),
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}
