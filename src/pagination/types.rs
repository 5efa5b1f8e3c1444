//! Pagination types
//!
//! Page planning, the aggregated result, and per-page diagnostics.

use crate::error::Error;
use crate::types::JsonValue;
use serde::Serialize;
use std::fmt;

/// One page to fetch, derived from the total count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// Zero-based page index
    pub page_index: u64,
    /// Offset of the first item on this page
    pub offset: u64,
}

impl PageRequest {
    /// Page number sent to the API, shifted by the configured start page
    ///
    /// `None` when the shifted number does not fit in a `u64`.
    pub fn page_number(&self, start_page: u64) -> Option<u64> {
        start_page.checked_add(self.page_index)
    }
}

/// Compute the pages covering `total_count` items
///
/// Offsets run `0, page_size, 2 * page_size, ...` while below the total,
/// so the result has `ceil(total_count / page_size)` entries.
pub fn plan_pages(total_count: u64, page_size: u64) -> Vec<PageRequest> {
    if page_size == 0 {
        return Vec::new();
    }

    (0..total_count.div_ceil(page_size))
        .map(|page_index| PageRequest {
            page_index,
            offset: page_index * page_size,
        })
        .collect()
}

/// Phase of a fetch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Coordinator built, nothing fetched yet
    Created,
    /// Resolving the total item count
    CountResolving,
    /// Page tasks in flight
    Fetching,
    /// All page tasks finished
    Merged,
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::CountResolving => "count_resolving",
            Self::Fetching => "fetching",
            Self::Merged => "merged",
        };
        f.write_str(name)
    }
}

/// Items merged from every successful page
///
/// Item order follows task completion and is not stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregatedResult {
    items: Vec<JsonValue>,
}

impl AggregatedResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one page's items
    pub(crate) fn merge(&mut self, items: Vec<JsonValue>) {
        self.items.extend(items);
    }

    /// Drop every item
    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items were merged
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrow the items
    pub fn items(&self) -> &[JsonValue] {
        &self.items
    }

    /// Iterate over the items
    pub fn iter(&self) -> std::slice::Iter<'_, JsonValue> {
        self.items.iter()
    }

    /// Take ownership of the items
    pub fn into_items(self) -> Vec<JsonValue> {
        self.items
    }

    /// Serialize the items as a JSON array string
    pub fn to_json_string(&self) -> String {
        JsonValue::Array(self.items.clone()).to_string()
    }
}

impl From<Vec<JsonValue>> for AggregatedResult {
    fn from(items: Vec<JsonValue>) -> Self {
        Self { items }
    }
}

impl<'a> IntoIterator for &'a AggregatedResult {
    type Item = &'a JsonValue;
    type IntoIter = std::slice::Iter<'a, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A page whose items were dropped from the result
#[derive(Debug)]
pub struct PageFailure {
    /// Page that failed
    pub page: PageRequest,
    /// Why it failed
    pub error: Error,
}

impl fmt::Display for PageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} failed: {}", self.page.page_index, self.error)
    }
}
