//! Configuration loading and management

use crate::core::accessor::AccessorRegistry;
use crate::core::column::ColumnDef;
use crate::core::error::ConfigError;
use crate::core::schema::ViewSchema;
use crate::core::sort::SortSpec;
use crate::core::validation::ValidationRules;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use validator::Validate;

/// Bundled dataset configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Hugo Award novels
    Books,
    /// Doctor Who episodes
    Episodes,
}

impl Preset {
    fn yaml(self) -> &'static str {
        match self {
            Preset::Books => include_str!("presets/books.yaml"),
            Preset::Episodes => include_str!("presets/episodes.yaml"),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "books" | "hugo" => Ok(Preset::Books),
            "episodes" | "doctor-who" => Ok(Preset::Episodes),
            other => Err(format!("Unknown preset '{}' (expected books or episodes)", other)),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Books => f.write_str("books"),
            Preset::Episodes => f.write_str("episodes"),
        }
    }
}

fn default_envelope_keys() -> Vec<String> {
    vec!["items".to_string()]
}

/// Complete description of one dataset's table
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ViewConfig {
    /// Dataset name (e.g., "books")
    #[validate(length(min = 1))]
    pub name: String,

    /// Column used for exact / contains relevance tiers
    #[validate(length(min = 1))]
    pub primary: String,

    /// Column holding the record identifier
    #[serde(default)]
    pub id_field: Option<String>,

    /// Sort applied when the user has not picked one (`"year:desc,title"`)
    #[serde(default)]
    pub default_sort: Option<String>,

    /// Object keys that may wrap the record array (`{"items": [...]}`)
    #[serde(default = "default_envelope_keys")]
    pub envelope_keys: Vec<String>,

    #[serde(default)]
    pub validation: ValidationRules,

    /// Columns in display order
    #[validate(nested)]
    pub columns: Vec<ColumnDef>,
}

impl ViewConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    ///
    /// The configuration is checked before it is returned.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Load a bundled configuration
    pub fn preset(preset: Preset) -> Result<Self, ConfigError> {
        Self::from_yaml_str(preset.yaml())
    }

    /// Validate field formats and cross-references
    ///
    /// Every column key must be unique, and `primary`, `id_field`, the
    /// default sort and every validation rule must name a declared column.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;

        if self.columns.is_empty() {
            return Err(ConfigError::NoColumns);
        }

        let mut keys = HashSet::new();
        for column in &self.columns {
            if !keys.insert(column.key.as_str()) {
                return Err(ConfigError::DuplicateColumn(column.key.clone()));
            }
        }

        let known = |column: &str, context: &str| -> Result<(), ConfigError> {
            if keys.contains(column) {
                Ok(())
            } else {
                Err(ConfigError::UnknownColumn {
                    column: column.to_string(),
                    context: context.to_string(),
                })
            }
        };

        known(&self.primary, "primary")?;
        if let Some(id_field) = &self.id_field {
            known(id_field, "id_field")?;
        }
        for key in self.default_sort().keys() {
            known(&key.field, "default_sort")?;
        }
        for column in self.validation.referenced_columns() {
            known(column, "validation")?;
        }
        Ok(())
    }

    /// The parsed default sort (empty when unset)
    pub fn default_sort(&self) -> SortSpec {
        self.default_sort
            .as_deref()
            .map(SortSpec::parse)
            .unwrap_or_default()
    }

    /// Build the accessor registry for these columns
    pub fn registry(&self) -> AccessorRegistry {
        AccessorRegistry::from_columns(self.columns.iter().cloned())
    }

    /// Build the full pipeline schema
    pub fn schema(&self) -> ViewSchema {
        let mut schema = ViewSchema::new(self.registry())
            .with_primary(self.primary.clone())
            .with_default_sort(self.default_sort())
            .with_rules(self.validation.clone());
        schema.id_field = self.id_field.clone();
        schema
    }

    pub fn envelope_keys(&self) -> Vec<&str> {
        self.envelope_keys.iter().map(String::as_str).collect()
    }
}
