use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Archive RSS articles into one deduplicated JSON record per day")]
#[command(version)]
pub struct Cli {
    /// Base directory holding data/channels (config) and data/items (archive)
    #[arg(
        long = "base-dir",
        alias = "base_dir",
        global = true,
        env = "DAYBOOK_BASE_DIR",
        default_value = "./"
    )]
    pub base_dir: PathBuf,

    /// Defaults to `run` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all configured feeds and merge new articles into the archive
    Run {
        /// Dry run - fetch and bucket articles but don't write any record
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the merged owner/channel configuration
    Channels,

    /// List archived days with their article counts
    Days,
}
