//! Render command implementation
//!
//! Vectorizes a stroke file and writes the SVG, no network involved.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use inktrace::export_svg::SvgWriter;
use log::info;

use crate::cli::RenderArgs;
use crate::input;

pub fn run(args: &RenderArgs, config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let strokes = input::read_strokes(&args.input)?;

    let vectorizer = super::vectorizer(&config, args.mode);
    let document = vectorizer
        .vectorize(&strokes)
        .context("cannot vectorize strokes")?;
    let svg = SvgWriter::new().write(&document);

    match &args.output {
        Some(path) => {
            std::fs::write(path, &svg)
                .with_context(|| format!("cannot write {}", path.display()))?;
            info!(
                "Rendered {} shapes ({}) to {}",
                document.len(),
                vectorizer.options().mode,
                path.display()
            );
        }
        None => {
            io::stdout()
                .lock()
                .write_all(svg.as_bytes())
                .context("cannot write to stdout")?;
        }
    }
    Ok(())
}
