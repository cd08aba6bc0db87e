//! Standard-stream capture into the tracing pipeline.
//!
//! A worker started with `--log-std` must not let task output bypass the logger.
//! Rebinding the process-wide stdout/stderr is not something safe Rust does, so output is
//! captured at the sink instead: task bodies write into a [`StdLogWriter`], which turns
//! every complete line into a tracing event.
//!
//! - [`StdStream::Stdout`] lines are emitted at `INFO`.
//! - [`StdStream::Stderr`] lines are emitted at `ERROR`.
use std::{fmt, io};

use tracing::{error, info};

/// Which standard stream a writer stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    Stdout,
    Stderr,
}

impl StdStream {
    pub fn as_str(&self) -> &'static str {
        match self {
            StdStream::Stdout => "stdout",
            StdStream::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StdStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `io::Write` sink that forwards output line by line to `tracing`.
///
/// Partial lines are buffered until a newline arrives, [`io::Write::flush`] is called,
/// or the writer is dropped. Lines longer than the configured limit are truncated.
pub struct StdLogWriter {
    stream: StdStream,
    buf: Vec<u8>,
    max_line: usize,
}

/// Default upper bound for a single emitted line.
const DEFAULT_MAX_LINE: usize = 4096;

impl StdLogWriter {
    pub fn new(stream: StdStream) -> Self {
        Self {
            stream,
            buf: Vec::new(),
            max_line: DEFAULT_MAX_LINE,
        }
    }

    pub fn stdout() -> Self {
        Self::new(StdStream::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(StdStream::Stderr)
    }

    /// Override the line length limit (bytes).
    pub fn with_max_line(mut self, max_line: usize) -> Self {
        self.max_line = max_line.max(1);
        self
    }

    pub fn stream(&self) -> StdStream {
        self.stream
    }

    fn emit(&self, raw: &[u8]) {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.is_empty() {
            return;
        }
        let truncated = raw.len() > self.max_line;
        let line = String::from_utf8_lossy(&raw[..raw.len().min(self.max_line)]);

        match self.stream {
            StdStream::Stdout => info!(stream = %self.stream, truncated, "{line}"),
            StdStream::Stderr => error!(stream = %self.stream, truncated, "{line}"),
        }
    }

    fn drain_complete_lines(&mut self) {
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let rest = self.buf.split_off(pos + 1);
            let line = std::mem::replace(&mut self.buf, rest);
            self.emit(&line[..pos]);
        }
    }
}

impl io::Write for StdLogWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        self.drain_complete_lines();
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let pending = std::mem::take(&mut self.buf);
            self.emit(&pending);
        }
        Ok(())
    }
}

impl Drop for StdLogWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

impl fmt::Debug for StdLogWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdLogWriter")
            .field("stream", &self.stream)
            .field("pending", &self.buf.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::Write,
        sync::{Arc, Mutex},
    };

    use super::*;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` under a plain-text subscriber and return what it logged.
    fn captured(f: impl FnOnce()) -> String {
        let capture = Capture::default();
        let sink = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let bytes = capture.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn stderr_lines_are_logged_at_error() {
        let out = captured(|| {
            let mut w = StdLogWriter::stderr();
            writeln!(w, "oops").unwrap();
        });
        let line = out.lines().find(|l| l.contains("oops")).expect("no event for stderr line");
        assert!(line.contains("ERROR"), "{line}");
        assert!(line.contains("stream=stderr"), "{line}");
        assert!(line.contains("truncated=false"), "{line}");
    }

    #[test]
    fn stdout_lines_are_logged_at_info() {
        let out = captured(|| {
            let mut w = StdLogWriter::stdout();
            writeln!(w, "all good").unwrap();
        });
        let line = out.lines().find(|l| l.contains("all good")).expect("no event for stdout line");
        assert!(line.contains("INFO"), "{line}");
        assert!(!line.contains("ERROR"), "{line}");
        assert!(line.contains("stream=stdout"), "{line}");
    }

    #[test]
    fn long_lines_are_cut_and_flagged() {
        let out = captured(|| {
            let mut w = StdLogWriter::stdout().with_max_line(4);
            writeln!(w, "héllo world").unwrap();
        });
        let line = out.lines().find(|l| l.contains("truncated=")).expect("no event for long line");
        assert!(line.contains("hél "), "{line}");
        assert!(!line.contains("world"), "{line}");
        assert!(line.contains("truncated=true"), "{line}");
    }

    #[test]
    fn drop_flushes_partial_line() {
        let out = captured(|| {
            let mut w = StdLogWriter::stdout();
            w.write_all(b"tail without newline").unwrap();
        });
        assert!(out.contains("tail without newline"), "{out}");
    }

    #[test]
    fn complete_lines_leave_no_pending_bytes() {
        let mut w = StdLogWriter::stdout();
        write!(w, "first\nsecond\n").unwrap();
        assert!(w.buf.is_empty());
    }

    #[test]
    fn partial_line_is_kept_until_newline() {
        let mut w = StdLogWriter::stderr();
        w.write_all(b"half").unwrap();
        assert_eq!(w.buf, b"half");

        w.write_all(b" line\nnext").unwrap();
        assert_eq!(w.buf, b"next");
    }

    #[test]
    fn flush_emits_pending_bytes() {
        let mut w = StdLogWriter::stdout();
        w.write_all(b"no newline").unwrap();
        w.flush().unwrap();
        assert!(w.buf.is_empty());
    }

    #[test]
    fn write_reports_full_length() {
        let mut w = StdLogWriter::stdout().with_max_line(4);
        let n = w.write(b"longer than four\n").unwrap();
        assert_eq!(n, 17);
    }

    #[test]
    fn stream_names() {
        assert_eq!(StdStream::Stdout.to_string(), "stdout");
        assert_eq!(StdLogWriter::stderr().stream(), StdStream::Stderr);
    }
}
