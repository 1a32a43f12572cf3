//! View queries, their string form, and pagination

use crate::core::accessor::AccessorRegistry;
use crate::core::filter::{FieldFilter, FilterQuery};
use crate::core::sort::SortSpec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum page size
pub const MAX_LIMIT: usize = 100;

/// Everything that shapes the current view
///
/// A query is a plain value: every change produces a new query and the
/// pipeline recomputes the view from the base collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewQuery {
    /// Free-text search
    pub text: Option<String>,

    /// Per-column filters
    pub filters: FilterQuery,

    /// Explicit sort; the schema's default sort applies when empty
    pub sort: SortSpec,

    /// Rank search results by relevance tier before sorting
    pub relevance: bool,

    /// Page number (starts at 1); no pagination when unset
    pub page: Option<usize>,

    /// Page size; no pagination when unset
    pub limit: Option<usize>,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            text: None,
            filters: FilterQuery::default(),
            sort: SortSpec::default(),
            relevance: true,
            page: None,
            limit: None,
        }
    }
}

impl ViewQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, filter: FieldFilter) -> Self {
        self.filters.set(key, filter);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_relevance(mut self, relevance: bool) -> Self {
        self.relevance = relevance;
        self
    }

    pub fn with_page(mut self, page: usize, limit: usize) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// Search text, `None` when blank
    pub fn search_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Whether pagination was requested
    pub fn is_paginated(&self) -> bool {
        self.page.is_some() || self.limit.is_some()
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Get limit, clamped to `1..=MAX_LIMIT` (defaults to 20)
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(20).clamp(1, MAX_LIMIT)
    }
}

/// The string form of a query, as read from a URL or a form
///
/// # Example
/// ```text
/// q=rose&filter={"era": "Modern", "year": "2000s"}&sort=rank:asc&page=1&limit=20
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Free-text search
    pub q: Option<String>,

    /// Filters as a JSON object of column key to string value
    ///
    /// Each value is read with the column's filter kind (see
    /// [`FieldFilter::parse`]).
    pub filter: Option<String>,

    /// Sort list, `field[:asc|desc]` separated by commas
    pub sort: Option<String>,

    /// Set to `false` to keep search results in plain sort order
    pub relevance: Option<bool>,

    pub page: Option<usize>,

    pub limit: Option<usize>,
}

impl QueryParams {
    /// Parse filter JSON string into Value
    ///
    /// Malformed JSON is treated as "no filter".
    pub fn filter_value(&self) -> Option<Value> {
        self.filter
            .as_ref()
            .and_then(|s| serde_json::from_str(s).ok())
    }

    /// Build a typed query against a registry
    pub fn to_query(&self, registry: &AccessorRegistry) -> ViewQuery {
        let filters = match self.filter_value() {
            Some(Value::Object(map)) => {
                let entries = map.iter().filter_map(|(key, value)| {
                    let text = match value {
                        Value::String(s) => s.clone(),
                        Value::Number(n) => n.to_string(),
                        Value::Bool(b) => b.to_string(),
                        _ => return None,
                    };
                    Some((key.clone(), text))
                });
                FilterQuery::from_strings(entries, registry)
            }
            Some(_) => {
                tracing::warn!("Ignoring filter parameter that is not a JSON object");
                FilterQuery::default()
            }
            None => FilterQuery::default(),
        };

        ViewQuery {
            text: self.q.clone(),
            filters,
            sort: self.sort.as_deref().map(SortSpec::parse).unwrap_or_default(),
            relevance: self.relevance.unwrap_or(true),
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        // Ensure limit is at least 1 to avoid division by zero
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = Self::offset(page, limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }

    /// Index range of the current page within `total` items
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = Self::offset(self.page, self.limit).min(self.total);
        let end = start.saturating_add(self.limit).min(self.total);
        start..end
    }

    // Saturates: page numbers come straight from user input
    fn offset(page: usize, limit: usize) -> usize {
        page.saturating_sub(1).saturating_mul(limit)
    }
}
