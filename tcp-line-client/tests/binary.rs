//! End-to-end tests of the `tcp-line-client` binary: exit codes, usage text,
//! and stdout/stderr separation.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener};
use std::process::{Command, Output, Stdio};
use std::thread;

fn client(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tcp-line-client"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn client");
    // The client may exit before reading stdin; a broken pipe here is fine.
    let _ = child
        .stdin
        .take()
        .expect("stdin handle")
        .write_all(stdin.as_bytes());
    child.wait_with_output().expect("wait for client")
}

fn echo_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind echo server");
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut writer = stream.try_clone().expect("clone stream");
        for line in BufReader::new(stream).lines() {
            let Ok(line) = line else { break };
            if writer.write_all(format!("{line}\n").as_bytes()).is_err() {
                break;
            }
        }
    });
    addr
}

/// No arguments: usage on stdout, exit status 1.
#[test]
fn no_arguments_prints_usage_and_exits_1() {
    let out = client(&[], "");
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "Usage: tcp-line-client <host> <port>\n"
    );
}

/// One argument too many is a usage error as well.
#[test]
fn three_arguments_prints_usage_and_exits_1() {
    let out = client(&["127.0.0.1", "9000", "extra"], "");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("Usage:"));
}

/// A port above 65535 is rejected at the command line.
#[test]
fn out_of_range_port_exits_1() {
    let out = client(&["127.0.0.1", "70000"], "");
    assert_eq!(out.status.code(), Some(1));
}

/// A refused connect exits 2 with a single diagnostic line and nothing on stdout.
#[test]
fn refused_connection_exits_2_with_one_diagnostic() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let out = client(&["127.0.0.1", &port.to_string()], "hello\n");

    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.lines().count(), 1, "stderr: {stderr}");
    assert!(stderr.starts_with("error: could not connect to 127.0.0.1:"), "{stderr}");
}

/// `ping` then `quit` against an echo server prints `ping` and exits cleanly.
#[test]
fn ping_then_quit_prints_ping_and_exits_0() {
    let addr = echo_server();
    let out = client(
        &[&addr.ip().to_string(), &addr.port().to_string()],
        "ping\nquit\n",
    );

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&out.stdout), "ping\n");
    assert!(out.stderr.is_empty());
}

/// Running out of stdin is a graceful end.
#[test]
fn end_of_input_exits_0() {
    let addr = echo_server();
    let out = client(
        &[&addr.ip().to_string(), &addr.port().to_string()],
        "hello\n",
    );

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&out.stdout), "hello\n");
}

/// `--help` prints clap's help on stdout and exits 0.
#[test]
fn help_exits_0() {
    let out = client(&["--help"], "");
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Usage"));
}

/// `--version` prints the version and exits 0.
#[test]
fn version_exits_0() {
    let out = client(&["--version"], "");
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));
}
