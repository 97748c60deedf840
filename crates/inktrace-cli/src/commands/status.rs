//! Status command implementation
//!
//! Compares a label list against the SVG files present in the destination
//! folder.

use std::path::Path;

use anyhow::{bail, Context, Result};
use inktrace::core::SubmissionError;
use inktrace::submit::{list_svg_stems, ProgressStore};
use serde::Serialize;

use crate::cli::StatusArgs;
use crate::input;

#[derive(Debug, Serialize)]
struct StatusItem<'a> {
    index: usize,
    label: &'a str,
    file_stem: Option<&'a str>,
    uploaded: bool,
}

#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    folder: &'a str,
    completed: usize,
    total: usize,
    items: Vec<StatusItem<'a>>,
}

pub fn run(args: &StatusArgs, config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let destination = config.remote_config();
    if !destination.is_complete() {
        bail!(SubmissionError::MissingConfiguration);
    }

    let labels = input::read_labels(&args.labels)?;
    let mut progress = ProgressStore::new(labels, config.export.naming);

    let store = inktrace::https_store(&config);
    let stems = list_svg_stems(&store, &destination)
        .with_context(|| format!("cannot list '{}'", destination.folder()))?;
    progress.reconcile(&stems);

    let report = StatusReport {
        folder: destination.folder(),
        completed: progress.completed_count(),
        total: progress.len(),
        items: progress
            .labels()
            .iter()
            .enumerate()
            .map(|(index, label)| StatusItem {
                index,
                label,
                file_stem: progress.expected_stem(index),
                uploaded: progress.is_completed(index),
            })
            .collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}/{} labels uploaded", report.completed, report.total);
    for item in report.items.iter().filter(|item| !item.uploaded) {
        println!(
            "missing\t{}\t{}",
            item.label,
            item.file_stem.unwrap_or_default()
        );
    }
    Ok(())
}
