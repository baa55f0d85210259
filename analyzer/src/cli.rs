use clap::{value_parser, Args, Parser, ValueHint::FilePath};
use std::path::PathBuf;

#[derive(Debug, Args)]
#[group(conflicts_with_all = ["AnalyzerInfo", "ConfigFile"])]
pub struct PipelineArgs {
    /// The capacity of every stage's inbox, in lines
    #[arg(value_parser = value_parser!(u32).range(1..=1_000_000))]
    pub queue_size: u32,

    /// The transforms to run, in pipeline order
    #[arg(value_name = "STAGE", num_args = 1..)]
    pub stages: Vec<String>,
}

#[derive(Debug, Args)]
#[group(conflicts_with = "AnalyzerInfo")]
pub struct ConfigFile {
    /// A TOML file describing the pipeline to assemble
    #[arg(short, long, value_hint = FilePath)]
    pub config: PathBuf,
}

#[derive(Debug, Args)]
#[group(multiple = false)]
pub struct AnalyzerInfo {
    /// Prints an example pipeline configuration file
    #[arg(short = 'e', long)]
    pub print_example_config: bool,
}

/// Run a pipeline of string transforms over standard input.
///
/// Lines are handed to the first stage in order; each stage transforms
/// them and forwards the result to the next. The literal line `<END>`
/// flows through the whole pipeline and shuts it down.
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about)]
pub struct Cli {
    #[command(flatten)]
    pub info: Option<AnalyzerInfo>,

    #[command(flatten)]
    pub file: Option<ConfigFile>,

    #[command(flatten)]
    pub pipeline: Option<PipelineArgs>,

    /// Feed the end-of-stream marker if standard input ends without one
    #[arg(long)]
    pub end_on_eof: bool,
}
