//! Subcommand implementations

pub mod batch;
pub mod config;
pub mod render;
pub mod status;
pub mod submit;

use std::path::Path;

use anyhow::{Context, Result};
use inktrace::vectorize::{VectorizeMode, Vectorizer};
use inktrace::Config;

/// Settings from `--config`, or the usual lookup when it is absent
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_path(path),
        None => Config::load(),
    };
    config.context("cannot load configuration")
}

/// Vectorizer from the config, with the command line's mode taking precedence
pub fn vectorizer(config: &Config, mode: Option<VectorizeMode>) -> Vectorizer {
    let vectorizer = Vectorizer::new(config.vectorize_options());
    match mode {
        Some(mode) => vectorizer.with_mode(mode),
        None => vectorizer,
    }
}
