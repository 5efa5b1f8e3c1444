//! Output module
//!
//! Persists an aggregated result as JSON.
//!
//! # Destinations
//!
//! - Local files (`/path/out.json`, `file:///path/out.json`)
//! - Any `std::io::Write` stream
//! - Object stores (`s3://`, `r2://`, `gs://`, `az://`)

mod cloud;
mod sink;

pub use cloud::{is_cloud_url, CloudDestination};
pub use sink::{Destination, ResultSink};
