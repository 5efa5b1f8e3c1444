//! CLI module
//!
//! Command-line interface around [`PaginationCoordinator`](crate::pagination::PaginationCoordinator).
//!
//! # Commands
//!
//! - `fetch` - Fetch every page and print or save the merged result
//! - `validate` - Check a configuration file

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::{FetchArgs, Runner};
