//! Sort specifications and the multi-key comparator

use crate::core::accessor::{AccessorRegistry, RegisteredColumn};
use crate::core::field::ComparableValue;
use crate::core::record::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Direction of one sort key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    /// The opposite direction
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Parse `asc`, `ascending`, `desc` or `descending` (any case)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// One `(column, direction)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,

    #[serde(default)]
    pub direction: SortDirection,
}

/// Ordered sort keys, most significant first
///
/// An empty spec leaves records in their incoming order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// A spec with a single key
    pub fn by(field: impl Into<String>, direction: SortDirection) -> Self {
        Self::new().then_by(field, direction)
    }

    /// Append a tie-breaking key
    ///
    /// A key already present for the same field is replaced.
    pub fn then_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        let field = field.into();
        self.keys.retain(|key| key.field != field);
        self.keys.push(SortKey { field, direction });
        self
    }

    /// Column-header click behaviour
    ///
    /// Selecting the current primary key flips its direction and keeps the
    /// secondary keys. Selecting any other column sorts by it alone,
    /// ascending.
    pub fn toggle(&self, field: &str) -> Self {
        match self.keys.first() {
            Some(primary) if primary.field == field => {
                let mut keys = self.keys.clone();
                keys[0].direction = primary.direction.toggled();
                Self { keys }
            }
            _ => Self::by(field, SortDirection::Ascending),
        }
    }

    /// Parse the `field[:asc|desc]` list form (`"year:desc,title"`)
    ///
    /// Blank entries are skipped and an unreadable direction falls back to
    /// ascending.
    pub fn parse(input: &str) -> Self {
        input
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .fold(Self::new(), |spec, entry| {
                let (field, direction) = match entry.split_once(':') {
                    Some((field, direction)) => {
                        let parsed = SortDirection::parse(direction).unwrap_or_else(|| {
                            tracing::warn!(
                                field = field.trim(),
                                direction,
                                "Unknown sort direction, using ascending"
                            );
                            SortDirection::Ascending
                        });
                        (field.trim(), parsed)
                    }
                    None => (entry, SortDirection::Ascending),
                };
                if field.is_empty() {
                    spec
                } else {
                    spec.then_by(field, direction)
                }
            })
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn primary(&self) -> Option<&SortKey> {
        self.keys.first()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}:{}", key.field, key.direction.as_str())?;
        }
        Ok(())
    }
}

/// Compare two values in a direction, keeping missing values last
pub fn compare_values(
    a: &ComparableValue,
    b: &ComparableValue,
    direction: SortDirection,
) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = a.cmp_ascending(b);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    }
}

/// A sort spec resolved against a registry
///
/// Keys naming unknown columns are dropped with a warning.
#[derive(Debug)]
pub struct SortPlan<'a> {
    keys: Vec<(&'a RegisteredColumn, SortDirection)>,
}

impl<'a> SortPlan<'a> {
    pub fn new(spec: &SortSpec, registry: &'a AccessorRegistry) -> Self {
        let keys = spec
            .keys()
            .iter()
            .filter_map(|key| match registry.get(&key.field) {
                Some(column) => Some((column, key.direction)),
                None => {
                    tracing::warn!(field = %key.field, "Ignoring sort on unknown column");
                    None
                }
            })
            .collect();
        Self { keys }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Precompute the ordering keys of a record
    pub fn sort_keys(&self, record: &Record) -> Vec<ComparableValue> {
        self.keys
            .iter()
            .map(|(column, _)| column.extract(record).sortable)
            .collect()
    }

    /// Compare two precomputed key vectors
    pub fn compare(&self, a: &[ComparableValue], b: &[ComparableValue]) -> Ordering {
        self.keys
            .iter()
            .zip(a.iter().zip(b.iter()))
            .map(|((_, direction), (a, b))| compare_values(a, b, *direction))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Stable sort of a set of record indices
///
/// Each record's keys are extracted once.
pub fn sort_indices(
    records: &[Record],
    indices: &[usize],
    registry: &AccessorRegistry,
    spec: &SortSpec,
) -> Vec<usize> {
    let plan = SortPlan::new(spec, registry);
    if plan.is_empty() {
        return indices.to_vec();
    }

    let mut decorated: Vec<(Vec<ComparableValue>, usize)> = indices
        .iter()
        .map(|&index| (plan.sort_keys(&records[index]), index))
        .collect();
    decorated.sort_by(|(a, _), (b, _)| plan.compare(a, b));
    decorated.into_iter().map(|(_, index)| index).collect()
}
