// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pagefan
//!
//! Concurrently fetch every page of a paginated HTTP API and aggregate the
//! items into one collection.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagefan::{PaginationConfig, PaginationCoordinator, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = PaginationConfig::builder("https://api.example.com/items?", 100)
//!         .header("Authorization", "Bearer ...")
//!         .build()?;
//!
//!     // Probes the total count, then fetches every page concurrently
//!     let coordinator = PaginationCoordinator::new(config).await?;
//!
//!     for failure in coordinator.failures() {
//!         eprintln!("{failure}");
//!     }
//!     coordinator.save_to_file("items.json")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  PaginationCoordinator                    │
//! │   new() → resolve count → plan pages → fan out → merge    │
//! └───────────────────────────────────────────────────────────┘
//!                               │
//! ┌───────────────┬─────────────┴──────┬──────────────────────┐
//! │ CountResolver │    PageFetcher     │      ResultSink      │
//! ├───────────────┼────────────────────┼──────────────────────┤
//! │ Override      │ pageSize/page URL  │ Local file           │
//! │ Probe + field │ Data field extract │ io::Write stream     │
//! │ candidates    │ Per-page failures  │ S3 / R2 / GCS / Azure│
//! └───────────────┴────────────────────┴──────────────────────┘
//!                               │
//!                     HttpFetch (reqwest)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common type aliases
pub mod types;

/// Pagination configuration
pub mod config;

/// HTTP capability and reqwest client
pub mod http;

/// Count resolution, page fetching and the fan-out coordinator
pub mod pagination;

/// Result persistence
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{CountProbeFailure, PaginationConfig};
pub use error::{Error, Result};
pub use http::{HttpClient, HttpFetch, HttpResponse};
pub use output::{Destination, ResultSink};
pub use pagination::{AggregatedResult, PageFailure, PaginationCoordinator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
