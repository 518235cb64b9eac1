//! `tcp-line-client` — an interactive line-oriented client over one TCP
//! connection.
//!
//! # Architecture
//!
//! ```text
//!  ┌────────────┐  line   ┌───────────────────────────────┐  "line\n"  ┌────────┐
//!  │ LineSource │────────▶│           Session             │───────────▶│ remote │
//!  └────────────┘         │  (owns state machine + conn)  │◀───────────│ server │
//!                         └──────────────┬────────────────┘   chunk    └────────┘
//!                                        │ trimmed text
//!                                        ▼
//!                                     stdout
//! ```
//!
//! Each module has a single responsibility:
//! - [`endpoint`]   — validated host/port pair
//! - [`connection`] — owned byte stream: send one line, receive one chunk, close
//! - [`session`]    — the alternating request/response loop
//! - [`state`]      — session finite-state-machine types
//! - [`input`]      — local line source abstraction
//! - [`transport`]  — byte-stream trait under the connection
//! - [`error`]      — fatal error taxonomy
//! - [`cli`]        — argument parsing, usage text, exit codes

pub mod cli;
pub mod connection;
pub mod endpoint;
pub mod error;
pub mod input;
pub mod session;
pub mod state;
pub mod transport;

pub use connection::{Connection, Received, Response, DEFAULT_CHUNK_SIZE};
pub use endpoint::Endpoint;
pub use error::{ConnectionError, EndpointError, SessionError};
pub use input::{LineSource, Lines};
pub use session::{
    connect_and_run, Session, SessionConfig, SessionEnd, SessionStats, DEFAULT_SENTINEL,
};
pub use state::SessionState;
pub use transport::Transport;
