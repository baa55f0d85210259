//! End-to-end runs of small pipelines over literal input, checking the
//! logger's output.

use libstage::{Pipeline, Transform};
use libxform::Logger;
use std::{
    io::{Cursor, Write},
    sync::{Arc, Mutex},
};

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

/// Assembles the named stages (loggers capture into a shared sink),
/// processes `input`, and returns everything the loggers printed.
fn run_pipeline(stages: &[&str], input: &str) -> String {
    let sink = SharedSink::default();

    let specs: Vec<(String, Box<dyn Transform>)> = stages
        .iter()
        .map(|&name| {
            let transform: Box<dyn Transform> = if name == "logger" {
                Box::new(Logger::with_sink(Box::new(sink.clone())))
            } else {
                libxform::create(name).expect("every scenario stage is known")
            };
            (name.to_string(), transform)
        })
        .collect();

    let pipeline = Pipeline::build(5, specs).unwrap();
    assert!(pipeline.process(Cursor::new(input.to_string())));
    pipeline.shutdown().unwrap();

    sink.contents()
}

#[test]
fn logger_alone() {
    assert_eq!(
        run_pipeline(&["logger"], "hello\n<END>\n"),
        "[logger] hello\n"
    );
}

#[test]
fn uppercaser_then_logger() {
    assert_eq!(
        run_pipeline(&["uppercaser", "logger"], "test\n<END>\n"),
        "[logger] TEST\n"
    );
}

#[test]
fn rotator_then_logger() {
    assert_eq!(
        run_pipeline(&["rotator", "logger"], "abc\n<END>\n"),
        "[logger] cab\n"
    );
}

#[test]
fn flipper_then_logger() {
    assert_eq!(
        run_pipeline(&["flipper", "logger"], "hello\n<END>\n"),
        "[logger] olleh\n"
    );
}

#[test]
fn expander_then_logger() {
    assert_eq!(
        run_pipeline(&["expander", "logger"], "hi\n<END>\n"),
        "[logger] h i\n"
    );
}

#[test]
fn two_rotators_then_logger() {
    assert_eq!(
        run_pipeline(&["rotator", "rotator", "logger"], "abc\n<END>\n"),
        "[logger] bca\n"
    );
}

#[test]
fn loggers_at_both_ends_see_before_and_after() {
    assert_eq!(
        run_pipeline(&["logger", "flipper", "logger"], "abc\n<END>\n"),
        "[logger] abc\n[logger] cba\n"
    );
}

#[test]
fn multiple_lines_keep_their_order() {
    assert_eq!(
        run_pipeline(&["uppercaser", "logger"], "one\ntwo\nthree\n<END>\n"),
        "[logger] ONE\n[logger] TWO\n[logger] THREE\n"
    );
}

#[test]
fn empty_lines_flow_through() {
    assert_eq!(
        run_pipeline(&["expander", "logger"], "\nab\n<END>\n"),
        "[logger] \n[logger] a b\n"
    );
}
