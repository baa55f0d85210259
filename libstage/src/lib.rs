//! Stage runtime and pipeline wiring.
//!
//! A [`Stage`] owns one inbox queue, one worker thread, one
//! [`Transform`], and an optional forward hook into the next stage.
//! A [`Pipeline`] is an ordered chain of stages fed from a
//! line-oriented input source and terminated by the in-band
//! [`SENTINEL`] token.
//!
//! [`transform`] contains the [`Transform`](transform::Transform)
//! trait and its [`Output`](transform::Output) contract.
//!
//! [`stage`] contains the [`Stage`](stage::Stage) runtime.
//!
//! [`pipeline`] contains the [`Pipeline`](pipeline::Pipeline) and the
//! input-processing loop.

#![warn(missing_docs)]

mod error;
pub mod pipeline;
pub mod stage;
pub mod transform;

pub use error::StageError;
pub use pipeline::Pipeline;
pub use stage::{ForwardHook, Stage};
pub use transform::{Output, Transform};

/// The in-band end-of-stream token.
///
/// The sentinel traverses the pipeline like any other line, but is
/// never transformed: each stage forwards it verbatim, signals its
/// `finished` latch, and stops its worker.
pub const SENTINEL: &str = "<END>";

/// The published input line maximum, in bytes, including the newline
/// terminator.
pub const MAX_LINE_LEN: usize = 1024;
