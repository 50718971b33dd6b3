//! webscaffold - command-line tool for scaffolding Rust web projects.
//!
//! The binary wires the generation commands together: project bootstrap,
//! controller/middleware/model generation and router synthesis. See the
//! library documentation for the pipeline behind `mkrt`.
//!
//! # Usage
//!
//! ```bash
//! webscaffold init myapp
//! webscaffold addc user list search:get
//! webscaffold mkrt
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;

use webscaffold::cli;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("webscaffold starting...");

    cli::run(args)?;

    info!("done");

    Ok(())
}
