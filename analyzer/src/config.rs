//! Datastructures describing a pipeline for the analyzer to assemble.

use libstage::{Pipeline, Transform};
use libsync::queue::MAX_CAPACITY;
use serde::Deserialize;
use std::{error::Error, path::Path};

/// Describes a pipeline: how deep each inbox is and which transforms
/// run, in order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineConfiguration {
    /// The capacity of every stage's inbox, in lines
    pub queue_size: usize,
    /// The transforms to run, in pipeline order
    pub stages: Vec<String>,
}

impl PipelineConfiguration {
    /// Reads a configuration from a TOML file.
    ///
    /// Reads the entire contents of `file` to memory and deserializes
    /// it.
    pub fn from_toml_file(file: &Path) -> Result<Self, Box<dyn Error>> {
        let content = std::fs::read_to_string(file)?;

        Ok(toml::from_str(&content)?)
    }

    /// Checks the bounds the command-line parser enforces on its own
    /// arguments, for configurations that arrived from a file.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.queue_size == 0 || self.queue_size > MAX_CAPACITY {
            return Err(format!(
                "queue_size must be between 1 and {MAX_CAPACITY} (got {})",
                self.queue_size
            )
            .into());
        }

        if self.stages.is_empty() {
            return Err("at least one stage is required".into());
        }

        if let Some(unknown) = self
            .stages
            .iter()
            .find(|name| libxform::create(name).is_none())
        {
            return Err(format!(
                "unrecognized stage: {unknown} (known stages: {})",
                libxform::known_names().join(", ")
            )
            .into());
        }

        Ok(())
    }

    /// Resolves every stage name and assembles the pipeline.
    pub fn into_pipeline(self) -> Result<Pipeline, Box<dyn Error>> {
        self.validate()?;

        let specs: Vec<(String, Box<dyn Transform>)> = self
            .stages
            .into_iter()
            .map(|name| {
                let transform = libxform::create(&name)
                    .expect("validate checked every stage name");
                (name, transform)
            })
            .collect();

        Ok(Pipeline::build(self.queue_size, specs)?)
    }
}
