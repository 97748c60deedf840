//! Submit command implementation
//!
//! Runs one drawing through save, dedup and upload, then prints the remote path.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::SubmitArgs;
use crate::input;

pub fn run(args: &SubmitArgs, config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let strokes = input::read_strokes(&args.input)?;
    let document = super::vectorizer(&config, args.mode)
        .vectorize(&strokes)
        .context("cannot vectorize strokes")?;

    let submitter = inktrace::https_submitter(&config);
    let receipt = submitter
        .submit(&document, &args.label)
        .with_context(|| format!("cannot submit '{}'", args.label))?;

    eprintln!("Saved {}", receipt.local_path.display());
    println!("{}", receipt.remote_path);
    Ok(())
}
