//! Side-effecting transforms: write to a sink, pass the line through.
//!
//! Both printers write through a `Box<dyn Write + Send>` so a host (or
//! a test) can substitute any sink for standard output. Writes are
//! flushed before the transform returns; standard output is shared, so
//! each instance is on its own to keep a line intact.

use libstage::{Output, Transform};
use log::warn;
use std::{
    io::{stdout, Write},
    thread,
    time::Duration,
};

/// How long the [`Typewriter`] rests between characters by default.
pub const TYPEWRITER_DELAY: Duration = Duration::from_millis(100);

/// Writes `[logger] <line>` to its sink and passes the line through.
pub struct Logger {
    sink: Box<dyn Write + Send>,
}

impl Logger {
    /// A logger printing to standard output.
    pub fn new() -> Self {
        Self::with_sink(Box::new(stdout()))
    }

    /// A logger printing to an arbitrary sink.
    pub fn with_sink(sink: Box<dyn Write + Send>) -> Self {
        Self { sink }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for Logger {
    fn apply(&mut self, line: &str) -> Output {
        if let Err(e) = writeln!(self.sink, "[logger] {line}").and_then(|_| self.sink.flush()) {
            warn!("logger could not write: {e}");
        }
        Output::Pass
    }
}

/// Writes `[typewriter] <line>` one character at a time, flushing
/// after each, and passes the line through.
pub struct Typewriter {
    sink: Box<dyn Write + Send>,
    delay: Duration,
}

impl Typewriter {
    /// A typewriter printing to standard output with the default
    /// per-character delay.
    pub fn new() -> Self {
        Self::with_sink(Box::new(stdout()), TYPEWRITER_DELAY)
    }

    /// A typewriter printing to an arbitrary sink.
    ///
    /// A zero `delay` never sleeps.
    pub fn with_sink(sink: Box<dyn Write + Send>, delay: Duration) -> Self {
        Self { sink, delay }
    }

    fn type_out(&mut self, line: &str) -> std::io::Result<()> {
        // The prefix is typed out like the payload, one character at
        // a time.
        let mut utf8 = [0u8; 4];
        for c in "[typewriter] ".chars().chain(line.chars()) {
            self.sink.write_all(c.encode_utf8(&mut utf8).as_bytes())?;
            self.sink.flush()?;
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
        }

        writeln!(self.sink)?;
        self.sink.flush()
    }
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for Typewriter {
    fn apply(&mut self, line: &str) -> Output {
        if let Err(e) = self.type_out(line) {
            warn!("typewriter could not write: {e}");
        }
        Output::Pass
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// A sink the test keeps a handle on after giving it away.
    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl SharedSink {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn logger_prefixes_and_passes_through() {
        let sink = SharedSink::default();
        let mut logger = Logger::with_sink(Box::new(sink.clone()));

        assert!(logger.apply("hello").is_pass());
        assert!(logger.apply("").is_pass());

        assert_eq!(sink.contents(), "[logger] hello\n[logger] \n");
    }

    #[test]
    fn two_loggers_do_not_share_a_sink() {
        let first = SharedSink::default();
        let second = SharedSink::default();
        let mut a = Logger::with_sink(Box::new(first.clone()));
        let mut b = Logger::with_sink(Box::new(second.clone()));

        a.apply("one");
        b.apply("two");

        assert_eq!(first.contents(), "[logger] one\n");
        assert_eq!(second.contents(), "[logger] two\n");
    }

    #[test]
    fn typewriter_types_the_whole_line() {
        let sink = SharedSink::default();
        let mut typewriter =
            Typewriter::with_sink(Box::new(sink.clone()), Duration::ZERO);

        assert!(typewriter.apply("hi").is_pass());

        assert_eq!(sink.contents(), "[typewriter] hi\n");
    }

    #[test]
    fn typewriter_keeps_multibyte_characters_whole() {
        let sink = SharedSink::default();
        let mut typewriter =
            Typewriter::with_sink(Box::new(sink.clone()), Duration::ZERO);

        typewriter.apply("héllo → bye");

        assert_eq!(sink.contents(), "[typewriter] héllo → bye\n");
    }
}
