//! Application state passed explicitly through every interaction

use crate::core::filter::FieldFilter;
use crate::core::pipeline::{run, ViewOutput};
use crate::core::query::ViewQuery;
use crate::core::record::Record;
use crate::core::schema::ViewSchema;
use crate::core::sort::SortSpec;
use crate::core::validation::ValidationContext;
use std::sync::Arc;

/// The loaded dataset plus the current query
///
/// Records and schema are shared and immutable. Each interaction (typing in
/// the search box, picking a dropdown value, clicking a header) consumes the
/// state and returns the next one; [`AppState::view`] recomputes the view.
///
/// # Example
///
/// ```rust,ignore
/// let state = AppState::new(records, schema)
///     .with_text("rose")
///     .toggle_sort("year");
/// let view = state.view();
/// ```
#[derive(Debug, Clone)]
pub struct AppState {
    records: Arc<[Record]>,
    schema: Arc<ViewSchema>,
    query: ViewQuery,
    context: ValidationContext,
}

impl AppState {
    pub fn new(records: Vec<Record>, schema: ViewSchema) -> Self {
        Self {
            records: records.into(),
            schema: Arc::new(schema),
            query: ViewQuery::default(),
            context: ValidationContext::default(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn schema(&self) -> &ViewSchema {
        &self.schema
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    /// Replace the whole query
    pub fn with_query(mut self, query: ViewQuery) -> Self {
        self.query = query;
        self
    }

    /// Set the search text; returns to the first page
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.query.text = Some(text.into());
        self.rewind()
    }

    /// Set a filter from its string form, parsed with the column's filter kind
    ///
    /// Unknown columns and unreadable values leave the state unchanged.
    pub fn with_filter(self, key: &str, value: &str) -> Self {
        let Some(column) = self.schema.registry.get(key) else {
            tracing::warn!(column = key, "Ignoring filter on unknown column");
            return self;
        };
        match FieldFilter::parse(column.def.filter, value) {
            Some(filter) => self.with_field_filter(key, filter),
            None => {
                tracing::warn!(column = key, value, "Ignoring unreadable filter value");
                self
            }
        }
    }

    /// Set a typed filter; returns to the first page
    pub fn with_field_filter(mut self, key: impl Into<String>, filter: FieldFilter) -> Self {
        self.query.filters.set(key, filter);
        self.rewind()
    }

    pub fn without_filter(mut self, key: &str) -> Self {
        self.query.filters.remove(key);
        self.rewind()
    }

    /// Drop the search text and every filter
    pub fn clear_filters(mut self) -> Self {
        self.query.text = None;
        self.query.filters = Default::default();
        self.rewind()
    }

    /// Header click: flip the direction of the current primary key, or
    /// sort by a new column ascending
    ///
    /// Until a sort is picked, the schema's default sort is the one in
    /// effect, so the first click toggles from it.
    pub fn toggle_sort(mut self, key: &str) -> Self {
        let current = if self.query.sort.is_empty() {
            &self.schema.default_sort
        } else {
            &self.query.sort
        };
        self.query.sort = current.toggle(key);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.query.sort = sort;
        self
    }

    pub fn with_relevance(mut self, relevance: bool) -> Self {
        self.query.relevance = relevance;
        self
    }

    pub fn with_page(mut self, page: usize, limit: usize) -> Self {
        self.query.page = Some(page);
        self.query.limit = Some(limit);
        self
    }

    /// Override the year used for future-date warnings
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.context = ValidationContext::new(year);
        self
    }

    /// Compute the view for the current query
    pub fn view(&self) -> ViewOutput<'_> {
        run(&self.records, &self.schema, &self.query, &self.context)
    }

    fn rewind(mut self) -> Self {
        if self.query.page.is_some() {
            self.query.page = Some(1);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::accessor::AccessorRegistry;
    use crate::core::column::{ColumnDef, FieldKind, FilterKind};
    use crate::core::sort::SortDirection;
    use serde_json::json;

    fn state() -> AppState {
        let registry = AccessorRegistry::from_columns([
            ColumnDef::new("title", FieldKind::Text).searchable(),
            ColumnDef::new("era", FieldKind::Text).filtered_by(FilterKind::Exact),
            ColumnDef::new("rank", FieldKind::Number),
        ]);
        let records = vec![
            Record::new(json!({"title": "Rose", "era": "Modern", "rank": 3})),
            Record::new(json!({"title": "Genesis of the Daleks", "era": "Classic", "rank": 1})),
            Record::new(json!({"title": "Blink", "era": "Modern", "rank": 2})),
        ];
        AppState::new(records, ViewSchema::new(registry).with_primary("title"))
            .with_current_year(2026)
    }

    #[test]
    fn test_initial_view_keeps_base_order() {
        assert_eq!(state().view().indices(), vec![0, 1, 2]);
    }

    #[test]
    fn test_toggle_sort_cycles() {
        let asc = state().toggle_sort("rank");
        assert_eq!(asc.view().indices(), vec![1, 2, 0]);
        let desc = asc.toggle_sort("rank");
        assert_eq!(desc.view().indices(), vec![0, 2, 1]);
        let again = desc.toggle_sort("rank");
        assert_eq!(
            again.query().sort,
            SortSpec::by("rank", SortDirection::Ascending)
        );
    }

    #[test]
    fn test_first_toggle_flips_default_sort() {
        let state = state();
        let schema = state
            .schema()
            .clone()
            .with_default_sort(SortSpec::by("rank", SortDirection::Ascending));
        let state = AppState::new(state.records().to_vec(), schema);
        assert_eq!(state.view().indices(), vec![1, 2, 0]);

        let desc = state.toggle_sort("rank");
        assert_eq!(desc.query().sort, SortSpec::by("rank", SortDirection::Descending));
        assert_eq!(desc.view().indices(), vec![0, 2, 1]);
    }

    #[test]
    fn test_with_filter_parses_string() {
        let state = state().with_filter("era", "modern");
        assert_eq!(state.view().indices(), vec![0, 2]);
    }

    #[test]
    fn test_with_filter_unknown_column_is_noop() {
        let state = state().with_filter("nope", "x");
        assert!(state.query().filters.is_empty());
    }

    #[test]
    fn test_filter_change_rewinds_page() {
        let state = state().with_page(3, 1).with_filter("era", "Modern");
        assert_eq!(state.query().page, Some(1));
    }

    #[test]
    fn test_clear_filters() {
        let state = state().with_text("rose").with_filter("era", "Modern").clear_filters();
        assert_eq!(state.view().len(), 3);
        assert_eq!(state.query().text, None);
    }

    #[test]
    fn test_previous_state_is_untouched() {
        let before = state();
        let after = before.clone().with_text("blink");
        assert_eq!(before.view().len(), 3);
        assert_eq!(after.view().len(), 1);
    }
}
