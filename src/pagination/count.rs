//! Total count resolution

use super::fetcher::lookup_path;
use crate::config::CountProbeFailure;
use crate::error::{Error, Result};
use crate::http::HttpFetch;
use crate::types::{JsonValue, StringMap};
use std::sync::Arc;
use tracing::{debug, warn};

/// Works out how many items the endpoint holds
#[derive(Clone)]
pub struct CountResolver {
    http: Arc<dyn HttpFetch>,
    candidates: Vec<String>,
    on_probe_failure: CountProbeFailure,
}

impl CountResolver {
    /// Create a resolver checking `candidates` in order
    pub fn new(http: Arc<dyn HttpFetch>, candidates: Vec<String>) -> Self {
        Self {
            http,
            candidates,
            on_probe_failure: CountProbeFailure::default(),
        }
    }

    /// Set the policy for a non-success probe response
    #[must_use]
    pub fn on_probe_failure(mut self, policy: CountProbeFailure) -> Self {
        self.on_probe_failure = policy;
        self
    }

    /// Resolve the total item count
    ///
    /// An override is returned as-is without touching the network. Otherwise
    /// the endpoint is probed once, without pagination parameters.
    pub async fn resolve(
        &self,
        endpoint: &str,
        headers: &StringMap,
        total_count_override: Option<u64>,
    ) -> Result<u64> {
        if let Some(total) = total_count_override {
            debug!("Using total count override: {}", total);
            return Ok(total);
        }

        let response = self.http.get(endpoint, headers).await?;
        if !response.is_success() {
            return match self.on_probe_failure {
                CountProbeFailure::TreatAsZero => {
                    warn!(
                        "Count probe returned HTTP {}, treating total count as 0",
                        response.status
                    );
                    Ok(0)
                }
                CountProbeFailure::Fail => Err(Error::http_status(response.status, response.text())),
            };
        }

        let body: JsonValue = response.json()?;
        let total = self.extract_count(&body)?;
        debug!("Resolved total count: {}", total);
        Ok(total)
    }

    /// Read the first candidate field present in the probe body
    fn extract_count(&self, body: &JsonValue) -> Result<u64> {
        for field in &self.candidates {
            if let Some(value) = lookup_path(body, field) {
                return parse_count(field, value);
            }
        }

        Err(Error::CountFieldNotFound {
            candidates: self.candidates.clone(),
        })
    }
}

impl std::fmt::Debug for CountResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountResolver")
            .field("candidates", &self.candidates)
            .field("on_probe_failure", &self.on_probe_failure)
            .finish_non_exhaustive()
    }
}

/// Accept non-negative integers, or strings holding one
fn parse_count(field: &str, value: &JsonValue) -> Result<u64> {
    let parsed = match value {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| Error::InvalidCount {
        field: field.to_string(),
        value: value.to_string(),
    })
}
