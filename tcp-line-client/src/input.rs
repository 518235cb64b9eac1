//! Local source of request lines.

use std::io::{self, BufRead};

/// Produces request lines one at a time.
pub trait LineSource {
    /// Block until the next line is available.
    ///
    /// Returns `Ok(None)` once the source is exhausted.  The end-of-line
    /// marker (`\n` or `\r\n`) is not part of the returned line.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// [`LineSource`] over any buffered reader, e.g. a locked stdin.
#[derive(Debug)]
pub struct Lines<R> {
    reader: R,
    buf: String,
}

impl<R: BufRead> Lines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> LineSource for Lines<R> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        if self.buf.ends_with('\n') {
            self.buf.pop();
            if self.buf.ends_with('\r') {
                self.buf.pop();
            }
        }
        Ok(Some(self.buf.clone()))
    }
}
