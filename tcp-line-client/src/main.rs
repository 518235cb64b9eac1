//! Entry point for `tcp-line-client`.
//!
//! `main.rs` owns only process setup (logging, argument parsing, exit codes).
//! The exchange loop lives in the library.

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use tcp_line_client::cli::{self, Args, EXIT_FATAL, EXIT_OK, EXIT_USAGE};
use tcp_line_client::{connect_and_run, Lines, SessionEnd};

fn main() -> ExitCode {
    // Initialise env_logger; set RUST_LOG to control verbosity.
    env_logger::init();

    let args = match cli::parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(cli::UsageError::Clap(e)) if cli::is_informational(&e) => e.exit(),
        Err(e) => {
            log::debug!("usage error: {e}");
            println!("{}", cli::USAGE);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    match run(args) {
        Ok(end) => {
            log::debug!("exiting: {end}");
            ExitCode::from(EXIT_OK)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(args: Args) -> Result<SessionEnd> {
    let Args { endpoint, config } = args;
    let mut input = Lines::new(io::stdin().lock());
    let mut output = io::stdout().lock();
    Ok(connect_and_run(&endpoint, config, &mut input, &mut output)?)
}
