//! Command implementations for the frequency index CLI
//!
//! Each command is implemented in its own module:
//! - `build`: ingest a dataset export and write the region files
//! - `show`: print one region of a built index

pub mod build;
pub mod shared;
pub mod show;

use crate::cli::args::Commands;
use anyhow::Result;

/// Dispatch to the subcommand handler, after setting up logging
pub async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Build(build_args) => {
            shared::setup_logging(build_args.get_log_level(), build_args.quiet);
            build::run_build(build_args).await
        }
        Commands::Show(show_args) => {
            shared::setup_logging(show_args.get_log_level(), false);
            show::run_show(show_args).await
        }
    }
}
