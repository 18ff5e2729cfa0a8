use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed personal task manager.
/// Storage defaults to ~/.tm or a directory passed via --data-dir.
#[derive(Parser)]
#[command(name = "tm", version, about = "Personal task manager CLI")]
pub struct Cli {
    /// Path to the data directory holding the task records.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
