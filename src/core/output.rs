//! Swappable output destination
//!
//! The logger writes every emitted line to exactly one writer. Swapping the
//! writer hands the old one back to the caller, which makes the usual
//! save/replace/restore pattern straightforward:
//!
//! ```
//! use rust_vlog_system::core::output::{OutputSink, SharedBuffer};
//!
//! let sink = OutputSink::new(Box::new(std::io::sink()));
//! let capture = SharedBuffer::new();
//! let previous = sink.set_output(Box::new(capture.clone()));
//! sink.write_line("hello").unwrap();
//! sink.set_output(previous);
//!
//! assert_eq!(capture.contents(), "hello\n");
//! ```

use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

pub type BoxedWriter = Box<dyn Write + Send>;

pub struct OutputSink {
    writer: Mutex<BoxedWriter>,
}

impl OutputSink {
    pub fn new(writer: BoxedWriter) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Sink writing to standard error
    pub fn stderr() -> Self {
        Self::new(Box::new(io::stderr()))
    }

    /// Install `writer` and return the writer it replaces.
    ///
    /// Waits for an in-flight line to finish, so no line is split between
    /// the old and new writer.
    pub fn set_output(&self, writer: BoxedWriter) -> BoxedWriter {
        std::mem::replace(&mut *self.writer.lock(), writer)
    }

    /// Write one line, appending the trailing newline
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock();
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        writer.write_all(&buf)
    }

    pub fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }
}

impl Default for OutputSink {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSink").finish_non_exhaustive()
    }
}

/// Cloneable in-memory writer; all clones append to the same buffer.
///
/// Handy for capturing output in tests.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_output_returns_previous_writer() {
        let first = SharedBuffer::new();
        let second = SharedBuffer::new();
        let sink = OutputSink::new(Box::new(first.clone()));

        sink.write_line("to first").unwrap();
        let mut previous = sink.set_output(Box::new(second.clone()));
        sink.write_line("to second").unwrap();

        assert_eq!(first.contents(), "to first\n");
        assert_eq!(second.contents(), "to second\n");

        // The returned writer is the first buffer
        previous.write_all(b"direct").unwrap();
        assert_eq!(first.contents(), "to first\ndirect");
    }

    #[test]
    fn test_lines_are_not_interleaved() {
        use std::sync::Arc;
        use std::thread;

        let buffer = SharedBuffer::new();
        let sink = Arc::new(OutputSink::new(Box::new(buffer.clone())));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for _ in 0..50 {
                        sink.write_line(&format!("thread-{}-line", i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let contents = buffer.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 400);
        assert!(lines
            .iter()
            .all(|l| l.starts_with("thread-") && l.ends_with("-line")));
    }
}
