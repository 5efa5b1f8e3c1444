//! Configuration for a pagination cycle
//!
//! `PaginationConfig` can be built in code through its builder or loaded
//! from a YAML/JSON file. Every field except `endpoint` and `page_size`
//! has a serde default.

use crate::error::{Error, Result};
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Pagination Config
// ============================================================================

/// Everything needed to run one fetch cycle against a paginated endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Base URL, including any fixed query parameters
    /// (e.g. `https://api.example.com/items?status=open&`)
    pub endpoint: String,

    /// Items per page (must be > 0)
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Static headers attached to every request
    #[serde(default)]
    pub headers: StringMap,

    /// Known total item count; skips the count probe when set
    #[serde(default)]
    pub total_count_override: Option<u64>,

    /// Keys checked, in order, for the total count in the probe response
    #[serde(default = "default_count_fields")]
    pub total_count_field_candidates: Vec<String>,

    /// Key holding the item list in each page response (dot paths allowed)
    #[serde(default = "default_data_field")]
    pub data_field: String,

    /// Query parameter carrying the page number
    #[serde(default = "default_page_param")]
    pub page_param: String,

    /// Query parameter carrying the page size
    #[serde(default = "default_page_size_param")]
    pub page_size_param: String,

    /// Page number sent for the first page (usually 0 or 1)
    #[serde(default)]
    pub start_page: u64,

    /// Upper bound on simultaneous page requests (unbounded when unset)
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    /// What to do when the count probe returns a non-success status
    #[serde(default)]
    pub count_probe_failure: CountProbeFailure,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_page_size() -> u64 {
    100
}

fn default_count_fields() -> Vec<String> {
    vec![
        "total_count".to_string(),
        "totalCount".to_string(),
        "count".to_string(),
    ]
}

fn default_data_field() -> String {
    "data".to_string()
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_page_size_param() -> String {
    "pageSize".to_string()
}

/// Policy for a count probe that comes back with a non-success status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountProbeFailure {
    /// Treat the total as 0 and finish with an empty result
    #[default]
    TreatAsZero,
    /// Surface the HTTP error to the caller
    Fail,
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            user_agent: None,
        }
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

impl HttpConfig {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Connect timeout as a duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

// ============================================================================
// Construction & Loading
// ============================================================================

impl PaginationConfig {
    /// Create a config with defaults for everything but endpoint and page size
    pub fn new(endpoint: impl Into<String>, page_size: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            page_size,
            headers: StringMap::new(),
            total_count_override: None,
            total_count_field_candidates: default_count_fields(),
            data_field: default_data_field(),
            page_param: default_page_param(),
            page_size_param: default_page_size_param(),
            start_page: 0,
            max_concurrency: None,
            count_probe_failure: CountProbeFailure::default(),
            http: HttpConfig::default(),
        }
    }

    /// Create a config builder
    pub fn builder(endpoint: impl Into<String>, page_size: u64) -> PaginationConfigBuilder {
        PaginationConfigBuilder {
            config: Self::new(endpoint, page_size),
        }
    }

    /// Load a config from a YAML or JSON file (chosen by extension)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Parse and validate a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde can't express
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be greater than 0"));
        }

        if self.max_concurrency == Some(0) {
            return Err(Error::invalid_value(
                "max_concurrency",
                "must be greater than 0 when set",
            ));
        }

        if self.http.timeout_ms == 0 {
            return Err(Error::invalid_value("http.timeout_ms", "must be greater than 0"));
        }

        if self.http.connect_timeout_ms == 0 {
            return Err(Error::invalid_value(
                "http.connect_timeout_ms",
                "must be greater than 0",
            ));
        }

        if self.data_field.is_empty() {
            return Err(Error::invalid_value("data_field", "cannot be empty"));
        }

        if self.total_count_override.is_none() && self.total_count_field_candidates.is_empty() {
            return Err(Error::invalid_value(
                "total_count_field_candidates",
                "at least one field is required when no total count override is set",
            ));
        }

        url::Url::parse(&self.endpoint)?;
        Ok(())
    }
}

/// Builder for [`PaginationConfig`]
#[derive(Debug, Clone)]
pub struct PaginationConfigBuilder {
    config: PaginationConfig,
}

impl PaginationConfigBuilder {
    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(key.into(), value.into());
        self
    }

    /// Set a known total count, skipping the probe
    #[must_use]
    pub fn total_count(mut self, total: u64) -> Self {
        self.config.total_count_override = Some(total);
        self
    }

    /// Replace the count field candidates
    #[must_use]
    pub fn count_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.total_count_field_candidates = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the data field
    #[must_use]
    pub fn data_field(mut self, field: impl Into<String>) -> Self {
        self.config.data_field = field.into();
        self
    }

    /// Set the page and page size query parameter names
    #[must_use]
    pub fn params(mut self, page_param: impl Into<String>, page_size_param: impl Into<String>) -> Self {
        self.config.page_param = page_param.into();
        self.config.page_size_param = page_size_param.into();
        self
    }

    /// Set the first page number
    #[must_use]
    pub fn start_page(mut self, start: u64) -> Self {
        self.config.start_page = start;
        self
    }

    /// Bound the number of simultaneous page requests
    #[must_use]
    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.config.max_concurrency = Some(limit);
        self
    }

    /// Set the count probe failure policy
    #[must_use]
    pub fn count_probe_failure(mut self, policy: CountProbeFailure) -> Self {
        self.config.count_probe_failure = policy;
        self
    }

    /// Set the request timeout (millisecond precision)
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.http.timeout_ms = duration_millis(timeout);
        self
    }

    /// Set the connection timeout (millisecond precision)
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.http.connect_timeout_ms = duration_millis(timeout);
        self
    }

    /// Validate and build the config
    pub fn build(self) -> Result<PaginationConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
