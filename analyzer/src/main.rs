//! Assembles a pipeline of string transforms and drives it from
//! standard input until the end-of-stream marker flows through.

mod cli;
mod config;

use clap::Parser;
use cli::Cli;
use config::PipelineConfiguration;
use libstage::{Pipeline, SENTINEL};
use log::warn;
use std::{error::Error, io::stdin, process::ExitCode};
use toml::toml;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("analyzer: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(info) = cli.info {
        if info.print_example_config {
            println!(
                "{}",
                toml! {
                    queue_size = 20
                    stages = ["uppercaser", "rotator", "logger"]
                }
            );
        }
        return Ok(());
    }

    let configuration = if let Some(file) = cli.file {
        PipelineConfiguration::from_toml_file(&file.config)?
    } else if let Some(args) = cli.pipeline {
        PipelineConfiguration {
            queue_size: args.queue_size as usize,
            stages: args.stages,
        }
    } else {
        return Err("expected a queue size and a list of stages (see --help)".into());
    };

    let pipeline = configuration.into_pipeline()?;
    drive(&pipeline, cli.end_on_eof);
    pipeline.shutdown()?;

    println!("Pipeline shutdown complete");
    Ok(())
}

/// Feeds standard input into the pipeline.
///
/// Without `end_on_eof`, input that ends before a sentinel leaves the
/// pipeline running; the subsequent shutdown blocks until a sentinel
/// arrives. That is the deliberate default. Opting in synthesizes the
/// sentinel so the pipeline can drain and stop.
fn drive(pipeline: &Pipeline, end_on_eof: bool) {
    let saw_sentinel = pipeline.process(stdin().lock());

    if !saw_sentinel && end_on_eof {
        if let Err(e) = pipeline.feed(SENTINEL) {
            warn!("could not feed the end-of-stream marker: {e}");
        }
    }
}
