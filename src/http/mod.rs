//! HTTP module
//!
//! The pager only needs one capability from the network: "GET this URL with
//! these headers and give me the status and body". [`HttpFetch`] is that
//! seam; [`HttpClient`] implements it on top of reqwest.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpFetch, HttpResponse};
