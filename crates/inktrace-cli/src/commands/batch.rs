//! Batch command implementation
//!
//! Submits every job of a JSONL file on background workers and follows their
//! events the way an interactive session would.

use std::path::Path;

use anyhow::{bail, Context, Result};
use inktrace::submit::{ProgressStore, SubmissionQueue, UploadEvent};
use log::debug;

use crate::cli::BatchArgs;
use crate::input;

pub fn run(args: &BatchArgs, config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let jobs = input::read_jobs(&args.input)?;

    if !args.quiet {
        eprintln!("InkTrace batch v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("{} jobs from {}", jobs.len(), args.input.display());
    }

    let labels: Vec<String> = jobs.iter().map(|job| job.label.clone()).collect();
    let mut progress = ProgressStore::new(labels, config.export.naming);
    let queue =
        SubmissionQueue::new(inktrace::https_submitter(&config)).with_max_workers(args.jobs);

    // Jobs that never reach the queue
    let mut rejected = 0;
    for (job_num, job) in jobs.iter().enumerate() {
        let index = job.index.unwrap_or(job_num);
        let document = job
            .mode()
            .and_then(|mode| input::to_strokes(&job.strokes).map(|strokes| (mode, strokes)))
            .and_then(|(mode, strokes)| {
                super::vectorizer(&config, mode)
                    .vectorize(&strokes)
                    .context("cannot vectorize strokes")
            });
        match document {
            Ok(document) => {
                queue.submit(index, job.label.as_str(), document);
            }
            Err(e) => {
                eprintln!("Job {} ('{}'): {:#}", job_num + 1, job.label, e);
                rejected += 1;
            }
        }
    }

    let mut uploaded = 0;
    let mut failed = 0;
    while let Some(event) = queue.next_event() {
        if let Some(compensation) = progress.apply(&event) {
            debug!("Progress compensation: {:?}", compensation);
        }
        if let UploadEvent::Finished { label, result, .. } = &event {
            match result {
                Ok(receipt) => {
                    uploaded += 1;
                    if !args.quiet {
                        println!("{}\t{}", label, receipt.remote_path);
                    }
                }
                Err(e) => {
                    failed += 1;
                    eprintln!("'{}': {}", label, e);
                }
            }
        }
    }

    if !args.quiet {
        eprintln!();
        eprintln!("Batch complete:");
        eprintln!("  Total jobs: {}", jobs.len());
        eprintln!("  Uploaded: {}", uploaded);
        eprintln!("  Failed: {}", failed + rejected);
        eprintln!(
            "  Labels done: {}/{}",
            progress.completed_count(),
            progress.len()
        );
    }

    if failed + rejected > 0 {
        bail!("{} jobs failed", failed + rejected);
    }
    Ok(())
}
