//! Single-page fetching
//!
//! Builds the page URL, issues the GET and pulls the item list out of the
//! response body.

use super::types::PageRequest;
use crate::error::{Error, Result};
use crate::http::HttpFetch;
use crate::types::{JsonValue, StringMap};
use std::sync::Arc;
use tracing::debug;

/// Fetches one page and extracts its items
#[derive(Clone)]
pub struct PageFetcher {
    http: Arc<dyn HttpFetch>,
    endpoint: String,
    page_size: u64,
    start_page: u64,
    page_param: String,
    page_size_param: String,
    data_field: String,
    headers: StringMap,
}

impl PageFetcher {
    /// Create a fetcher with the default `pageSize` / `page` parameter names
    pub fn new(
        http: Arc<dyn HttpFetch>,
        endpoint: impl Into<String>,
        page_size: u64,
        headers: StringMap,
        data_field: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            page_size,
            start_page: 0,
            page_param: "page".to_string(),
            page_size_param: "pageSize".to_string(),
            data_field: data_field.into(),
            headers,
        }
    }

    /// Override the query parameter names
    #[must_use]
    pub fn with_params(
        mut self,
        page_param: impl Into<String>,
        page_size_param: impl Into<String>,
    ) -> Self {
        self.page_param = page_param.into();
        self.page_size_param = page_size_param.into();
        self
    }

    /// Shift the page number sent to the API
    #[must_use]
    pub fn with_start_page(mut self, start_page: u64) -> Self {
        self.start_page = start_page;
        self
    }

    /// URL for a page: endpoint + `pageSize=<n>&page=<i>`
    pub fn page_url(&self, page: &PageRequest) -> Result<String> {
        let number = page.page_number(self.start_page).ok_or_else(|| {
            Error::invalid_value(
                "start_page",
                format!("page {} overflows the page number", page.page_index),
            )
        })?;

        Ok(format!(
            "{}{}={}&{}={}",
            with_query_separator(&self.endpoint),
            self.page_size_param,
            self.page_size,
            self.page_param,
            number
        ))
    }

    /// Fetch a page and return its items
    ///
    /// Fails with [`Error::HttpStatus`] on a non-2xx response and with
    /// [`Error::MissingField`] when the data field is absent.
    pub async fn fetch(&self, page: &PageRequest) -> Result<Vec<JsonValue>> {
        let url = self.page_url(page)?;
        let response = self
            .http
            .get(&url, &self.headers)
            .await?
            .error_for_status()?;

        let body: JsonValue = response.json()?;
        let items = extract_items(&body, &self.data_field)?;

        debug!("Page {} returned {} items", page.page_index, items.len());
        Ok(items)
    }
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("endpoint", &self.endpoint)
            .field("page_size", &self.page_size)
            .field("data_field", &self.data_field)
            .finish_non_exhaustive()
    }
}

/// Make sure query parameters can be appended directly to the endpoint
fn with_query_separator(endpoint: &str) -> String {
    if endpoint.ends_with('?') || endpoint.ends_with('&') {
        endpoint.to_string()
    } else if endpoint.contains('?') {
        format!("{endpoint}&")
    } else {
        format!("{endpoint}?")
    }
}

/// Look up a dot-separated path in a JSON object
pub(crate) fn lookup_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        match current {
            JsonValue::Object(map) => current = map.get(part)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Pull the item list out of a page body
fn extract_items(body: &JsonValue, data_field: &str) -> Result<Vec<JsonValue>> {
    match lookup_path(body, data_field) {
        Some(JsonValue::Array(items)) => Ok(items.clone()),
        Some(JsonValue::Null) => Ok(Vec::new()),
        Some(other) => Ok(vec![other.clone()]),
        None => Err(Error::missing_field(data_field)),
    }
}
