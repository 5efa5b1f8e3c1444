//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Concurrent pager CLI
#[derive(Parser, Debug)]
#[command(name = "pagefan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every page and print or save the merged result
    Fetch {
        /// Endpoint URL, including fixed query parameters
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Items per page
        #[arg(short, long)]
        page_size: Option<u64>,

        /// Extra header as KEY=VALUE (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Known total count (skips the count probe)
        #[arg(long)]
        total_count: Option<u64>,

        /// Field holding the item list
        #[arg(long)]
        data_field: Option<String>,

        /// Count field candidate (repeatable, checked in order)
        #[arg(long = "count-field")]
        count_fields: Vec<String>,

        /// Maximum simultaneous page requests
        #[arg(long)]
        max_concurrency: Option<usize>,

        /// Fail instead of returning nothing when the count probe errors
        #[arg(long)]
        fail_on_count_error: bool,

        /// Output destination (local path or s3://, r2://, gs://, az:// URL)
        #[arg(short, long)]
        output: Option<String>,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a configuration file
    Validate,
}
