//! Field filters and their composition

use crate::core::accessor::{AccessorRegistry, RegisteredColumn};
use crate::core::column::FilterKind;
use crate::core::field::{fold, FieldValue, PLACEHOLDER};
use crate::core::record::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A predicate over one column
///
/// `Any` (and an empty `Contains`/`Equals`) matches every record. Every
/// other filter rejects a record whose column value is missing, except that
/// `Equals` may pick a labeled absence such as a series column's `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum FieldFilter {
    #[default]
    Any,
    /// Folded substring of the display value
    Contains(String),
    /// Folded equality with the display value
    Equals(String),
    /// Inclusive bounds on the numeric reading
    Range { min: Option<f64>, max: Option<f64> },
    /// Decade bucket of the numeric reading (`1980` holds 1980..=1989)
    Decade(i32),
}

/// Decade bucket of a number: `floor(n / 10) * 10`
pub fn decade_of(number: f64) -> i32 {
    ((number / 10.0).floor() * 10.0) as i32
}

impl FieldFilter {
    /// Substring filter, folded
    pub fn contains(text: &str) -> Self {
        FieldFilter::Contains(fold(text))
    }

    /// Equality filter, folded
    pub fn equals(text: &str) -> Self {
        FieldFilter::Equals(fold(text))
    }

    /// Interpret a user-facing string for a column's filter kind
    ///
    /// Blank input and `all` give `Any`. Returns `None` when the input
    /// cannot be read for that kind.
    pub fn parse(kind: FilterKind, input: &str) -> Option<Self> {
        let text = input.trim();
        if text.is_empty() || text.eq_ignore_ascii_case("all") {
            return Some(FieldFilter::Any);
        }

        match kind {
            FilterKind::Contains => Some(Self::contains(text)),
            FilterKind::Exact => Some(Self::equals(text)),
            FilterKind::Range => parse_range(text),
            FilterKind::Decade => {
                let digits = text.trim_end_matches('s').trim_end_matches('\'');
                let year = digits.parse::<i32>().ok()?;
                Some(FieldFilter::Decade(decade_of(f64::from(year))))
            }
        }
    }

    /// Whether this filter lets every record through
    pub fn is_any(&self) -> bool {
        match self {
            FieldFilter::Any => true,
            FieldFilter::Contains(text) | FieldFilter::Equals(text) => text.is_empty(),
            FieldFilter::Range { min, max } => min.is_none() && max.is_none(),
            FieldFilter::Decade(_) => false,
        }
    }

    /// Test one column value
    pub fn matches(&self, value: &FieldValue) -> bool {
        if self.is_any() {
            return true;
        }
        if value.is_missing() {
            return match self {
                FieldFilter::Equals(expected) => {
                    value.display != PLACEHOLDER && value.folded_display() == *expected
                }
                _ => false,
            };
        }

        match self {
            FieldFilter::Any => true,
            FieldFilter::Contains(needle) => value.folded_display().contains(needle.as_str()),
            FieldFilter::Equals(expected) => value.folded_display() == *expected,
            FieldFilter::Range { min, max } => value.numeric.is_some_and(|n| {
                min.is_none_or(|min| n >= min) && max.is_none_or(|max| n <= max)
            }),
            FieldFilter::Decade(decade) => value.numeric.is_some_and(|n| decade_of(n) == *decade),
        }
    }
}

/// `1960..1970`, `1960..`, `..1970` or a single number
fn parse_range(text: &str) -> Option<FieldFilter> {
    let bound = |part: &str| -> Option<Option<f64>> {
        let part = part.trim();
        if part.is_empty() {
            Some(None)
        } else {
            part.parse::<f64>().ok().filter(|n| n.is_finite()).map(Some)
        }
    };

    let (min, max) = match text.split_once("..") {
        Some((min, max)) => (bound(min)?, bound(max.trim_start_matches('='))?),
        None => {
            let exact = bound(text)?;
            (exact, exact)
        }
    };
    Some(FieldFilter::Range { min, max })
}

/// Named filters, one per column, AND-ed together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterQuery {
    filters: IndexMap<String, FieldFilter>,
}

impl FilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build filters from the string form used by dropdowns and inputs
    ///
    /// Each value is parsed with its column's filter kind. Unknown columns
    /// and unreadable values are dropped with a warning, which leaves that
    /// column unfiltered.
    pub fn from_strings<K, V>(
        entries: impl IntoIterator<Item = (K, V)>,
        registry: &AccessorRegistry,
    ) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::new();
        for (key, value) in entries {
            let (key, value) = (key.as_ref(), value.as_ref());
            let Some(column) = registry.get(key) else {
                tracing::warn!(column = key, "Ignoring filter on unknown column");
                continue;
            };
            match FieldFilter::parse(column.def.filter, value) {
                Some(filter) => query.set(key, filter),
                None => {
                    tracing::warn!(column = key, value, "Ignoring unreadable filter value");
                }
            }
        }
        query
    }

    /// Add or replace a filter
    pub fn with(mut self, key: impl Into<String>, filter: FieldFilter) -> Self {
        self.set(key, filter);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, filter: FieldFilter) {
        self.filters.insert(key.into(), filter);
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldFilter> {
        self.filters.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&FieldFilter> {
        self.filters.get(key)
    }

    /// Filters that actually constrain the view
    pub fn active(&self) -> impl Iterator<Item = (&str, &FieldFilter)> {
        self.filters
            .iter()
            .filter(|(_, filter)| !filter.is_any())
            .map(|(key, filter)| (key.as_str(), filter))
    }

    /// True when no filter constrains the view
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }
}

/// Active filters resolved against a registry
#[derive(Debug)]
pub struct FilterPlan<'a> {
    filters: Vec<(&'a RegisteredColumn, &'a FieldFilter)>,
}

impl<'a> FilterPlan<'a> {
    /// Resolve once; filters on unknown columns are skipped with a warning
    pub fn new(query: &'a FilterQuery, registry: &'a AccessorRegistry) -> Self {
        let filters = query
            .active()
            .filter_map(|(key, filter)| match registry.get(key) {
                Some(column) => Some((column, filter)),
                None => {
                    tracing::warn!(column = key, "Ignoring filter on unknown column");
                    None
                }
            })
            .collect();
        Self { filters }
    }

    /// Every active filter accepts the record
    pub fn matches(&self, record: &Record) -> bool {
        self.filters
            .iter()
            .all(|(column, filter)| filter.matches(&column.extract(record)))
    }
}

/// Indices of the records accepted by every filter, in base order
pub fn filter_indices(
    records: &[Record],
    registry: &AccessorRegistry,
    query: &FilterQuery,
) -> Vec<usize> {
    let plan = FilterPlan::new(query, registry);
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| plan.matches(record))
        .map(|(index, _)| index)
        .collect()
}
