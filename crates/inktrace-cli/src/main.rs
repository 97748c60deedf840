//! InkTrace CLI - vectorize handwriting and submit it to a GitHub repository

mod cli;
mod commands;
mod input;

use clap::Parser;

use crate::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match &cli.command {
        Commands::Render(args) => commands::render::run(args, config_path),
        Commands::Submit(args) => commands::submit::run(args, config_path),
        Commands::Batch(args) => commands::batch::run(args, config_path),
        Commands::Status(args) => commands::status::run(args, config_path),
        Commands::Config => commands::config::run(config_path),
    }
}
