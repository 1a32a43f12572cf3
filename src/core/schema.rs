//! Everything the pipeline knows about a dataset's columns

use crate::core::accessor::AccessorRegistry;
use crate::core::sort::SortSpec;
use crate::core::validation::ValidationRules;

/// Accessor registry plus the dataset-level roles of its columns
#[derive(Debug, Clone, Default)]
pub struct ViewSchema {
    pub registry: AccessorRegistry,

    /// Column matched for the exact / contains relevance tiers (usually "title")
    pub primary: Option<String>,

    /// Column holding the record identifier
    pub id_field: Option<String>,

    /// Order used when the query has no explicit sort
    pub default_sort: SortSpec,

    pub rules: ValidationRules,
}

impl ViewSchema {
    pub fn new(registry: AccessorRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    pub fn with_primary(mut self, key: impl Into<String>) -> Self {
        self.primary = Some(key.into());
        self
    }

    pub fn with_id_field(mut self, key: impl Into<String>) -> Self {
        self.id_field = Some(key.into());
        self
    }

    pub fn with_default_sort(mut self, sort: SortSpec) -> Self {
        self.default_sort = sort;
        self
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }
}
