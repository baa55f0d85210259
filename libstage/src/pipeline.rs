//! Pipeline assembly, input processing, and teardown.
//!
//! A [`Pipeline`] is an ordered chain of [`Stage`]s. Stage `i`
//! forwards into stage `i + 1`; the last stage keeps no hook, so its
//! output is either consumed by its transform (a printer) or dropped.

use crate::{stage::Stage, transform::Transform, StageError, MAX_LINE_LEN, SENTINEL};
use log::warn;
use std::io::BufRead;

/// An ordered chain of stages fed from a line-oriented input source.
#[derive(Debug)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Wires already-spawned stages into a chain.
    ///
    /// Stage `i` forwards into stage `i + 1`. At least one stage is
    /// required.
    pub fn assemble(stages: Vec<Stage>) -> Result<Self, StageError> {
        if stages.is_empty() {
            return Err(StageError::Empty);
        }

        for i in 0..stages.len() - 1 {
            let hook = stages[i + 1].forward_hook();
            stages[i].attach(hook)?;
        }

        Ok(Self { stages })
    }

    /// Spawns one stage per `(name, transform)` pair and wires the
    /// chain.
    ///
    /// Every stage's inbox gets the same `queue_size`. If any stage
    /// fails to spawn, the stages spawned so far are finalized in
    /// reverse order and the failure is returned.
    pub fn build(
        queue_size: usize,
        specs: impl IntoIterator<Item = (String, Box<dyn Transform>)>,
    ) -> Result<Self, StageError> {
        let mut stages = Vec::new();

        for (name, transform) in specs {
            match Stage::spawn(name, queue_size, transform) {
                Ok(stage) => stages.push(stage),
                Err(e) => {
                    for mut stage in stages.drain(..).rev() {
                        let _ = stage.fini();
                    }
                    return Err(e);
                }
            }
        }

        Self::assemble(stages)
    }

    /// Copies a line into the first stage's inbox.
    pub fn feed(&self, line: &str) -> Result<(), StageError> {
        match self.stages.first() {
            Some(first) => first.place_work(line),
            None => Err(StageError::Empty),
        }
    }

    /// The input-processing loop.
    ///
    /// Reads lines (terminator stripped), feeds each into the first
    /// stage, and stops after feeding the [`SENTINEL`]. Read errors
    /// are treated as end of input. Feed failures are logged and do
    /// not terminate the loop. A line longer than the published
    /// maximum is forwarded intact, with a warning.
    ///
    /// Returns whether the sentinel was observed. End of input without
    /// a sentinel feeds nothing extra: until a sentinel arrives from
    /// somewhere, [`shutdown`](Pipeline::shutdown) will block.
    pub fn process(&self, input: impl BufRead) -> bool {
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("input error, treating as end of input: {e}");
                    return false;
                }
            };

            if line.len() >= MAX_LINE_LEN {
                warn!(
                    "input line exceeds {} bytes, forwarding intact",
                    MAX_LINE_LEN - 1
                );
            }

            if let Err(e) = self.feed(&line) {
                warn!("dropped an input line: {e}");
            }

            if line == SENTINEL {
                return true;
            }
        }

        false
    }

    /// Tears the pipeline down in order: waits for every stage's
    /// `finished` latch (ensuring the sentinel has traversed the whole
    /// chain), then finalizes every stage.
    ///
    /// Every stage is finalized even if an earlier one reports an
    /// error; the first error is returned.
    pub fn shutdown(mut self) -> Result<(), StageError> {
        for stage in &self.stages {
            stage.wait_finished();
        }

        let mut first_error = None;
        for stage in &mut self.stages {
            if let Err(e) = stage.fini() {
                warn!("failed to finalize stage \"{}\": {e}", stage.name());
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    /// The stages in pipeline order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The names of the stages in pipeline order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(Stage::name).collect()
    }

    /// The number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false for an assembled pipeline.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
