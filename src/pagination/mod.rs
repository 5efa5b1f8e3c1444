//! Pagination module
//!
//! Concurrent page-number pagination over an endpoint whose total item
//! count is known up front or can be probed.
//!
//! # Overview
//!
//! ```text
//! CountResolver ──► plan_pages ──► PageFetcher × N (tokio tasks)
//!                                        │
//!                                        ▼
//!                          Mutex<AggregatedResult> ──► ResultSink
//! ```
//!
//! [`PaginationCoordinator`] drives the whole cycle. Pages that fail are
//! dropped from the result and reported through
//! [`PaginationCoordinator::failures`].

mod coordinator;
mod count;
mod fetcher;
mod types;

pub use coordinator::PaginationCoordinator;
pub use count::CountResolver;
pub use fetcher::PageFetcher;
pub use types::{plan_pages, AggregatedResult, CycleState, PageFailure, PageRequest};
