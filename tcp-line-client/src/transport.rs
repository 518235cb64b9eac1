//! Byte-stream abstraction under [`crate::connection::Connection`].
//!
//! A [`Transport`] is any ordered, reliable, bidirectional byte stream that can
//! be shut down.  Production code uses [`TcpStream`]; tests substitute an
//! in-memory stream so the exchange loop can be checked without sockets.
//! All protocol logic lives elsewhere; this module owns only byte I/O.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

pub trait Transport: Read + Write {
    /// Stop both directions of the stream.  Called once, just before drop.
    fn shutdown(&mut self) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn shutdown(&mut self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}
