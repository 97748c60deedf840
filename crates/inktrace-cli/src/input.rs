//! Stroke files and batch jobs as JSON
//!
//! A stroke file holds `{"strokes": [[{"x": .., "y": .., "width": ..}, ..], ..]}`.
//! A batch file holds one job per line:
//! `{"label": "永", "index": 0, "mode": "centerline", "strokes": [..]}`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use inktrace::core::{Stroke, StrokeSample};
use inktrace::vectorize::VectorizeMode;
use serde::Deserialize;

/// One pen sample
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SampleSpec {
    pub x: f64,
    pub y: f64,
    /// Pen diameter; missing means no pressure information
    #[serde(default)]
    pub width: f64,
}

/// Contents of a stroke file
#[derive(Debug, Clone, Deserialize)]
pub struct StrokeFile {
    pub strokes: Vec<Vec<SampleSpec>>,
}

/// One line of a batch file
#[derive(Debug, Clone, Deserialize)]
pub struct BatchJob {
    pub label: String,
    /// Position in the label list; defaults to the line's job number
    #[serde(default)]
    pub index: Option<usize>,
    #[serde(default)]
    pub mode: Option<String>,
    pub strokes: Vec<Vec<SampleSpec>>,
}

impl BatchJob {
    pub fn mode(&self) -> Result<Option<VectorizeMode>> {
        self.mode
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(anyhow::Error::msg)
    }
}

/// Turn parsed sample lists into strokes, rejecting empty ones
pub fn to_strokes(specs: &[Vec<SampleSpec>]) -> Result<Vec<Stroke>> {
    specs
        .iter()
        .enumerate()
        .map(|(i, samples)| {
            let samples = samples
                .iter()
                .map(|s| StrokeSample::new(s.x, s.y, s.width))
                .collect();
            Stroke::new(samples).with_context(|| format!("stroke {i}"))
        })
        .collect()
}

fn open(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Read and parse a stroke file (`-` reads stdin)
pub fn read_strokes(path: &Path) -> Result<Vec<Stroke>> {
    let mut text = String::new();
    open(path)?
        .read_to_string(&mut text)
        .with_context(|| format!("cannot read {}", path.display()))?;
    parse_strokes(&text).with_context(|| format!("invalid stroke file {}", path.display()))
}

pub fn parse_strokes(text: &str) -> Result<Vec<Stroke>> {
    let file: StrokeFile = serde_json::from_str(text)?;
    if file.strokes.is_empty() {
        bail!("no strokes");
    }
    to_strokes(&file.strokes)
}

/// Read every non-blank line of a batch file as a job
pub fn read_jobs(path: &Path) -> Result<Vec<BatchJob>> {
    let mut jobs = Vec::new();
    for (line_num, line) in open(path)?.lines().enumerate() {
        let line = line.with_context(|| format!("cannot read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let job: BatchJob = serde_json::from_str(&line)
            .with_context(|| format!("invalid job on line {}", line_num + 1))?;
        jobs.push(job);
    }
    Ok(jobs)
}

/// Read a label list: one label per line, blank lines skipped
pub fn read_labels(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read labels from {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
