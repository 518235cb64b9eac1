//! Command-line surface.
//!
//! Exactly two positional arguments: the remote host and port.  Anything
//! else is a [`UsageError`], which the binary reports with [`USAGE`] on
//! standard output and [`EXIT_USAGE`].

use std::ffi::OsString;

use clap::Parser;
use thiserror::Error;

use crate::connection::DEFAULT_CHUNK_SIZE;
use crate::endpoint::Endpoint;
use crate::error::EndpointError;
use crate::session::SessionConfig;

pub const USAGE: &str = "Usage: tcp-line-client <host> <port>";

/// Sentinel typed, input exhausted, or peer closed.
pub const EXIT_OK: u8 = 0;
pub const EXIT_USAGE: u8 = 1;
/// Connection or other fatal session error.
pub const EXIT_FATAL: u8 = 2;

/// Send lines from stdin to a TCP server and print each reply.
///
/// Type `quit` on a line of its own to end the session.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Remote host name or IP address.
    host: String,
    /// Remote TCP port (1-65535).
    port: String,
    /// Maximum number of bytes read per response.
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_CHUNK_SIZE, value_parser = parse_chunk_size)]
    chunk_size: usize,
}

fn parse_chunk_size(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("chunk size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Validated invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub endpoint: Endpoint,
    pub config: SessionConfig,
}

#[derive(Error, Debug)]
pub enum UsageError {
    #[error(transparent)]
    Clap(#[from] clap::Error),
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

/// `--help` / `--version`: not a failure, clap prints and exits 0.
pub fn is_informational(err: &clap::Error) -> bool {
    matches!(
        err.kind(),
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
    )
}

/// Parse a full argv (program name first).
pub fn parse_args<I, T>(args: I) -> Result<Args, UsageError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    let endpoint = Endpoint::parse(&cli.host, &cli.port)?;
    Ok(Args {
        endpoint,
        config: SessionConfig::default().with_max_chunk(cli.chunk_size),
    })
}
