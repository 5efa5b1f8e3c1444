//! Fan-out coordinator
//!
//! Resolves the total count, spawns one task per page and merges every
//! page's items into a single [`AggregatedResult`].

use super::count::CountResolver;
use super::fetcher::PageFetcher;
use super::types::{plan_pages, AggregatedResult, CycleState, PageFailure, PageRequest};
use crate::config::PaginationConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, HttpFetch};
use crate::output::{Destination, ResultSink};
use futures::future::join_all;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info, warn};

/// Fetches every page of an endpoint and holds the merged result
///
/// Construction runs a full cycle; the coordinator is read-only afterwards
/// until [`refresh`](Self::refresh) is called.
pub struct PaginationCoordinator {
    config: PaginationConfig,
    http: Arc<dyn HttpFetch>,
    state: CycleState,
    results: AggregatedResult,
    failures: Vec<PageFailure>,
    total_count: u64,
    pages: Vec<PageRequest>,
}

impl PaginationCoordinator {
    /// Build a coordinator on a reqwest client and run the first cycle
    pub async fn new(config: PaginationConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::with_config(HttpClientConfig::from(&config.http))?;
        Self::with_fetcher(config, Arc::new(client)).await
    }

    /// Build a coordinator on a caller-supplied HTTP capability and run the first cycle
    pub async fn with_fetcher(config: PaginationConfig, http: Arc<dyn HttpFetch>) -> Result<Self> {
        config.validate()?;

        let mut coordinator = Self {
            config,
            http,
            state: CycleState::Created,
            results: AggregatedResult::new(),
            failures: Vec::new(),
            total_count: 0,
            pages: Vec::new(),
        };
        coordinator.run_cycle().await?;
        Ok(coordinator)
    }

    /// Add or replace a header used by the next cycle
    pub fn add_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.config.headers.insert(key.into(), value.into());
    }

    /// Merged result of the last cycle
    pub fn get_results(&self) -> &AggregatedResult {
        &self.results
    }

    /// Merged result of the last cycle as a JSON array string
    pub fn results_json(&self) -> String {
        self.results.to_json_string()
    }

    /// Consume the coordinator, keeping the result
    pub fn into_results(self) -> AggregatedResult {
        self.results
    }

    /// Discard the current result and run a full cycle again
    pub async fn refresh(&mut self) -> Result<()> {
        self.run_cycle().await
    }

    /// Write the merged result to a file path or object-store URL
    pub async fn save_to(&self, destination: &str) -> Result<()> {
        let destination = Destination::parse(destination)?;
        ResultSink::new().write(&destination, &self.results).await
    }

    /// Write the merged result to a local file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        ResultSink::new().write_file(path, &self.results)
    }

    /// Pages dropped during the last cycle
    pub fn failures(&self) -> &[PageFailure] {
        &self.failures
    }

    /// Current cycle phase
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Total count resolved by the last cycle
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Number of page tasks launched by the last cycle
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Active configuration
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    async fn run_cycle(&mut self) -> Result<()> {
        let started = Instant::now();

        self.results.clear();
        self.failures.clear();
        self.pages.clear();
        self.total_count = 0;

        self.transition(CycleState::CountResolving);
        let resolver = CountResolver::new(
            Arc::clone(&self.http),
            self.config.total_count_field_candidates.clone(),
        )
        .on_probe_failure(self.config.count_probe_failure);

        let total = resolver
            .resolve(
                &self.config.endpoint,
                &self.config.headers,
                self.config.total_count_override,
            )
            .await?;
        self.total_count = total;

        let pages = plan_pages(total, self.config.page_size);
        if let Some(last) = pages.last() {
            if last.page_number(self.config.start_page).is_none() {
                return Err(Error::invalid_value(
                    "start_page",
                    format!(
                        "{} + {} pages overflows the page number",
                        self.config.start_page,
                        pages.len()
                    ),
                ));
            }
        }
        self.transition(CycleState::Fetching);
        info!(
            "Fetching {} pages ({} items, page size {}) from {}",
            pages.len(),
            total,
            self.config.page_size,
            self.config.endpoint
        );

        let (results, failures) = self.fetch_pages(&pages).await;
        self.results = results;
        self.failures = failures;
        self.pages = pages;
        self.transition(CycleState::Merged);

        info!(
            "Merged {} items from {} pages in {:?} ({} failed)",
            self.results.len(),
            self.pages.len(),
            started.elapsed(),
            self.failures.len()
        );
        Ok(())
    }

    /// Spawn one task per page and wait for all of them
    async fn fetch_pages(&self, pages: &[PageRequest]) -> (AggregatedResult, Vec<PageFailure>) {
        let fetcher = Arc::new(
            PageFetcher::new(
                Arc::clone(&self.http),
                self.config.endpoint.clone(),
                self.config.page_size,
                self.config.headers.clone(),
                self.config.data_field.clone(),
            )
            .with_params(&self.config.page_param, &self.config.page_size_param)
            .with_start_page(self.config.start_page),
        );
        let merged = Arc::new(Mutex::new(AggregatedResult::new()));
        let limiter = self
            .config
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit)));

        let handles: Vec<_> = pages
            .iter()
            .map(|&page| {
                let fetcher = Arc::clone(&fetcher);
                let merged = Arc::clone(&merged);
                let limiter = limiter.clone();

                tokio::spawn(async move {
                    let _permit = match &limiter {
                        Some(semaphore) => Some(semaphore.acquire().await.map_err(|e| {
                            Error::Task {
                                message: e.to_string(),
                            }
                        })?),
                        None => None,
                    };

                    let items = fetcher.fetch(&page).await?;
                    let count = items.len();

                    // Lock only for the append, never across the request
                    merged.lock().await.merge(items);
                    Ok::<usize, Error>(count)
                })
            })
            .collect();

        let outcomes = join_all(handles).await;

        let mut failures = Vec::new();
        for (page, outcome) in pages.iter().zip(outcomes) {
            let outcome = outcome.unwrap_or_else(|e| {
                Err(Error::Task {
                    message: e.to_string(),
                })
            });

            match outcome {
                Ok(count) => debug!("Merged {} items from page {}", count, page.page_index),
                Err(error) => {
                    warn!("Dropping page {}: {}", page.page_index, error);
                    failures.push(PageFailure { page: *page, error });
                }
            }
        }

        let results = match Arc::try_unwrap(merged) {
            Ok(mutex) => mutex.into_inner(),
            Err(shared) => shared.lock().await.clone(),
        };
        (results, failures)
    }

    fn transition(&mut self, next: CycleState) {
        debug!("Cycle state {} -> {}", self.state, next);
        self.state = next;
    }
}

impl std::fmt::Debug for PaginationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationCoordinator")
            .field("endpoint", &self.config.endpoint)
            .field("state", &self.state)
            .field("total_count", &self.total_count)
            .field("pages", &self.pages.len())
            .field("items", &self.results.len())
            .field("failures", &self.failures.len())
            .finish_non_exhaustive()
    }
}
