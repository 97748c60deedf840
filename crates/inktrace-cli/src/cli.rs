//! CLI argument definitions using Clap v4

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use inktrace::vectorize::VectorizeMode;

/// InkTrace - turn pen strokes into SVG samples and upload them to GitHub
#[derive(Parser, Debug)]
#[command(name = "inktrace")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: $INKTRACE_CONFIG, then the user config directory)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Vectorize a stroke file into an SVG without uploading
    #[command(alias = "r")]
    Render(RenderArgs),

    /// Vectorize a stroke file, save it and upload it
    #[command(alias = "s")]
    Submit(SubmitArgs),

    /// Submit many drawings from a JSONL file concurrently
    Batch(BatchArgs),

    /// Show which labels already have an uploaded sample
    Status(StatusArgs),

    /// Print the effective configuration
    Config,
}

/// Arguments for the render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Stroke JSON file, or `-` for stdin
    pub input: PathBuf,

    /// Output SVG file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Vectorize mode: pressure-outline or centerline
    #[arg(short = 'm', long = "mode")]
    pub mode: Option<VectorizeMode>,
}

/// Arguments for the submit command
#[derive(Parser, Debug)]
pub struct SubmitArgs {
    /// Stroke JSON file, or `-` for stdin
    pub input: PathBuf,

    /// The character or word that was drawn
    #[arg(short = 'l', long = "label")]
    pub label: String,

    /// Vectorize mode: pressure-outline or centerline
    #[arg(short = 'm', long = "mode")]
    pub mode: Option<VectorizeMode>,
}

/// Arguments for the batch command
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// JSONL file with one job per line, or `-` for stdin
    pub input: PathBuf,

    /// Uploads running at the same time
    #[arg(short = 'j', long = "jobs", default_value = "2")]
    pub jobs: usize,

    /// Silent mode
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

/// Arguments for the status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Text file with one label per line
    pub labels: PathBuf,

    /// Print the report as JSON
    #[arg(long = "json")]
    pub json: bool,
}
