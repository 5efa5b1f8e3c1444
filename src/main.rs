//! pagefan CLI
//!
//! Fetches every page of a paginated API from the command line

use clap::Parser;
use pagefan::cli::{Cli, Runner};

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays clean JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
