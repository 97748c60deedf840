//! Config command implementation

use std::path::Path;

use anyhow::Result;
use inktrace::Config;

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path)?;

    let source = config_path
        .map(Path::to_path_buf)
        .or_else(Config::config_path);
    match source {
        Some(path) => eprintln!("# Loaded from {}", path.display()),
        None => eprintln!("# Built-in defaults"),
    }
    eprintln!("# Local SVG folder: {}", config.output_dir().display());

    print!("{}", config.to_redacted_toml()?);
    Ok(())
}
