//! The view pipeline: validate, filter, rank, sort, paginate

use crate::core::accessor::AccessorRegistry;
use crate::core::field::ComparableValue;
use crate::core::filter::FilterPlan;
use crate::core::query::{PaginationMeta, ViewQuery};
use crate::core::record::Record;
use crate::core::relevance::{RelevanceScorer, RelevanceTier};
use crate::core::schema::ViewSchema;
use crate::core::sort::SortPlan;
use crate::core::validation::{validate, ValidationContext, ValidationWarning};
use std::cmp::Ordering;

/// One row of the computed view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewEntry<'a> {
    /// Position in the base collection
    pub index: usize,

    pub record: &'a Record,

    /// Search tier, when a search text is active
    pub tier: Option<RelevanceTier>,
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct ViewOutput<'a> {
    /// Ordered rows (the current page when paginated)
    pub entries: Vec<ViewEntry<'a>>,

    /// Warnings over the whole base collection
    pub warnings: Vec<ValidationWarning>,

    /// Number of matching records before pagination
    pub total: usize,

    pub pagination: Option<PaginationMeta>,
}

impl<'a> ViewOutput<'a> {
    /// Base indices in view order
    pub fn indices(&self) -> Vec<usize> {
        self.entries.iter().map(|entry| entry.index).collect()
    }

    /// Records in view order
    pub fn records(&self) -> Vec<&'a Record> {
        self.entries.iter().map(|entry| entry.record).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Warnings attached to one base record
    pub fn warnings_for(&self, index: usize) -> impl Iterator<Item = &ValidationWarning> {
        self.warnings
            .iter()
            .filter(move |warning| warning.record.index == index)
    }

    /// Header labels of the visible columns
    pub fn headers(registry: &AccessorRegistry) -> Vec<String> {
        registry
            .visible_columns()
            .map(|column| column.def.header().to_string())
            .collect()
    }

    /// Display strings of the visible columns, one row per entry
    pub fn display_rows(&self, registry: &AccessorRegistry) -> Vec<Vec<String>> {
        self.entries
            .iter()
            .map(|entry| {
                registry
                    .visible_columns()
                    .map(|column| column.extract(entry.record).display)
                    .collect()
            })
            .collect()
    }
}

struct Candidate {
    index: usize,
    tier: Option<RelevanceTier>,
    keys: Vec<ComparableValue>,
}

/// Compute the view of `records` for `query`
///
/// Pure: the same inputs always give the same output, and `records` is
/// never modified. Steps:
///
/// 1. validation warnings over the whole base collection
/// 2. field filters AND-ed with the search text (any searchable column)
/// 3. with relevance on and a search text set, the tier ranks first
/// 4. the query's sort, or the schema's default sort when it is empty;
///    ties keep base order
/// 5. the requested page, when pagination is set
pub fn run<'a>(
    records: &'a [Record],
    schema: &ViewSchema,
    query: &ViewQuery,
    context: &ValidationContext,
) -> ViewOutput<'a> {
    let registry = &schema.registry;
    let warnings = validate(
        records,
        registry,
        schema.id_field.as_deref(),
        &schema.rules,
        context,
    );

    let filters = FilterPlan::new(&query.filters, registry);
    let scorer = query
        .search_text()
        .and_then(|text| RelevanceScorer::new(text, registry, schema.primary.as_deref()));
    let sort = if query.sort.is_empty() {
        &schema.default_sort
    } else {
        &query.sort
    };
    let plan = SortPlan::new(sort, registry);

    let mut candidates: Vec<Candidate> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| filters.matches(record))
        .filter_map(|(index, record)| match &scorer {
            Some(scorer) => {
                let tier = scorer.score(record);
                tier.is_match().then_some((index, record, Some(tier)))
            }
            None => Some((index, record, None)),
        })
        .map(|(index, record, tier)| Candidate {
            index,
            tier,
            keys: plan.sort_keys(record),
        })
        .collect();

    let rank_by_tier = query.relevance && scorer.is_some();
    candidates.sort_by(|a, b| {
        let by_tier = if rank_by_tier {
            a.tier.cmp(&b.tier)
        } else {
            Ordering::Equal
        };
        by_tier.then_with(|| plan.compare(&a.keys, &b.keys))
    });

    let total = candidates.len();
    let pagination = query
        .is_paginated()
        .then(|| PaginationMeta::new(query.page(), query.limit(), total));
    let range = pagination.as_ref().map_or(0..total, PaginationMeta::range);

    let entries: Vec<ViewEntry<'a>> = candidates[range]
        .iter()
        .map(|candidate| ViewEntry {
            index: candidate.index,
            record: &records[candidate.index],
            tier: candidate.tier,
        })
        .collect();

    tracing::debug!(
        records = records.len(),
        matched = total,
        shown = entries.len(),
        warnings = warnings.len(),
        search = scorer.as_ref().map(|s| s.needle()),
        sort = %sort,
        "Computed view"
    );

    ViewOutput {
        entries,
        warnings,
        total,
        pagination,
    }
}
