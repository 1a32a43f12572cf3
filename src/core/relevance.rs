//! Search relevance tiers

use crate::core::accessor::{AccessorRegistry, RegisteredColumn};
use crate::core::field::fold;
use crate::core::record::Record;
use serde::Serialize;

/// How well a record matches a free-text query
///
/// Variants are ordered best first, so deriving `Ord` ranks them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceTier {
    /// The primary column equals the query
    Exact,
    /// The primary column contains the query
    PrimaryContains,
    /// Some other searchable column contains the query
    OtherField,
    /// Nothing matches
    NoMatch,
}

impl RelevanceTier {
    pub fn is_match(self) -> bool {
        self != RelevanceTier::NoMatch
    }
}

/// Scores records against one folded query
///
/// Holds the query and the columns to inspect so that scoring a whole
/// collection resolves them only once.
#[derive(Debug)]
pub struct RelevanceScorer<'a> {
    needle: String,
    primary: Option<&'a RegisteredColumn>,
    others: Vec<&'a RegisteredColumn>,
}

impl<'a> RelevanceScorer<'a> {
    /// Build a scorer, or `None` when the query is blank
    ///
    /// `primary` names the column matched for the two best tiers. All other
    /// searchable columns feed the `OtherField` tier.
    pub fn new(query: &str, registry: &'a AccessorRegistry, primary: Option<&str>) -> Option<Self> {
        let needle = fold(query);
        if needle.is_empty() {
            return None;
        }

        let primary = primary.and_then(|key| registry.get(key));
        let others = registry
            .searchable_columns()
            .filter(|column| primary.is_none_or(|p| p.def.key != column.def.key))
            .collect();

        Some(Self {
            needle,
            primary,
            others,
        })
    }

    /// The folded query
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Score one record; the first matching tier wins
    pub fn score(&self, record: &Record) -> RelevanceTier {
        if let Some(primary) = self.primary {
            let value = primary.extract(record);
            if !value.is_missing() {
                let folded = value.folded_display();
                if folded == self.needle {
                    return RelevanceTier::Exact;
                }
                if folded.contains(&self.needle) {
                    return RelevanceTier::PrimaryContains;
                }
            }
        }

        let other_match = self.others.iter().any(|column| {
            let value = column.extract(record);
            !value.is_missing() && value.folded_display().contains(&self.needle)
        });
        if other_match {
            RelevanceTier::OtherField
        } else {
            RelevanceTier::NoMatch
        }
    }
}
