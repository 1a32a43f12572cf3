//! Column definitions: which field a column reads and how it is interpreted

use serde::{Deserialize, Serialize};
use validator::Validate;

/// How a column interprets its raw value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text; numbers and booleans are rendered as text
    #[default]
    Text,
    /// Numeric value; non-numeric input is missing
    Number,
    /// Date in one of the supported shapes; displayed as its year
    Date,
    /// Nested person object rendered as `name (role)`
    Person,
    /// Tri-state `false | "name" | {name, order}`
    Series,
    /// Array rendered as a comma-separated list
    List,
    /// Array rendered as its length
    Count,
    /// Boolean rendered with configurable labels
    Flag,
}

/// How string filter values for a column are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// Case-insensitive substring of the display value
    #[default]
    Contains,
    /// Case-insensitive equality with the display value
    Exact,
    /// Inclusive numeric range (`1960..1970`)
    Range,
    /// Decade bucket (`1980` or `1980s`)
    Decade,
}

/// Keys of a nested person object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonKeys {
    #[serde(default = "default_name_key")]
    pub name_key: String,

    #[serde(default = "default_role_key")]
    pub role_key: String,
}

fn default_name_key() -> String {
    "actor".to_string()
}

fn default_role_key() -> String {
    "incarnation".to_string()
}

impl Default for PersonKeys {
    fn default() -> Self {
        Self {
            name_key: default_name_key(),
            role_key: default_role_key(),
        }
    }
}

/// Display labels of a boolean column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagLabels {
    #[serde(default = "default_true_label")]
    pub true_label: String,

    #[serde(default = "default_false_label")]
    pub false_label: String,
}

fn default_true_label() -> String {
    "Yes".to_string()
}

fn default_false_label() -> String {
    "No".to_string()
}

impl Default for FlagLabels {
    fn default() -> Self {
        Self {
            true_label: default_true_label(),
            false_label: default_false_label(),
        }
    }
}

/// Definition of one displayable column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ColumnDef {
    /// Column key used by filters and sort specs (e.g., "title", "doctor")
    #[validate(length(min = 1))]
    pub key: String,

    /// Header text; defaults to the key
    #[serde(default)]
    pub label: String,

    /// Dotted path of the field in a record (e.g., "award.year")
    #[validate(length(min = 1))]
    pub path: String,

    /// Paths tried in order when `path` is absent
    #[serde(default)]
    pub fallback_paths: Vec<String>,

    #[serde(default)]
    pub kind: FieldKind,

    /// Whether free-text search looks at this column
    #[serde(default)]
    pub searchable: bool,

    #[serde(default)]
    pub filter: FilterKind,

    /// Hidden columns still feed filters, sorting and validation
    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Keys for `person` columns
    #[serde(default)]
    pub person: Option<PersonKeys>,

    /// Labels for `flag` columns
    #[serde(default)]
    pub flag: Option<FlagLabels>,

    /// Key to display for object items in `list` columns (falls back to "name")
    #[serde(default)]
    pub item_key: Option<String>,
}

fn default_visible() -> bool {
    true
}

impl ColumnDef {
    /// Create a text column reading the field of the same name
    pub fn new(key: impl Into<String>, kind: FieldKind) -> Self {
        let key = key.into();
        Self {
            label: String::new(),
            path: key.clone(),
            key,
            fallback_paths: Vec::new(),
            kind,
            searchable: false,
            filter: FilterKind::default(),
            visible: true,
            person: None,
            flag: None,
            item_key: None,
        }
    }

    /// Read from a different path
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Add a fallback path
    pub fn or_at(mut self, path: impl Into<String>) -> Self {
        self.fallback_paths.push(path.into());
        self
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn filtered_by(mut self, filter: FilterKind) -> Self {
        self.filter = filter;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_person_keys(mut self, name_key: &str, role_key: &str) -> Self {
        self.person = Some(PersonKeys {
            name_key: name_key.to_string(),
            role_key: role_key.to_string(),
        });
        self
    }

    pub fn with_flag_labels(mut self, true_label: &str, false_label: &str) -> Self {
        self.flag = Some(FlagLabels {
            true_label: true_label.to_string(),
            false_label: false_label.to_string(),
        });
        self
    }

    /// Header text, falling back to the key
    pub fn header(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }

    /// The primary path followed by the fallbacks
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.path.as_str()).chain(self.fallback_paths.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let column = ColumnDef::new("title", FieldKind::Text);
        assert_eq!(column.path, "title");
        assert_eq!(column.header(), "title");
        assert!(column.visible);
        assert!(!column.searchable);
        assert_eq!(column.filter, FilterKind::Contains);
    }

    #[test]
    fn test_paths_order() {
        let column = ColumnDef::new("year", FieldKind::Date).or_at("award.year");
        let paths: Vec<&str> = column.paths().collect();
        assert_eq!(paths, vec!["year", "award.year"]);
    }

    #[test]
    fn test_yaml_defaults() {
        let yaml = "key: doctor\npath: doctor\nkind: person\nperson: {}\n";
        let column: ColumnDef = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(column.kind, FieldKind::Person);
        assert_eq!(column.person, Some(PersonKeys::default()));
        assert!(column.visible);
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let mut column = ColumnDef::new("title", FieldKind::Text);
        column.key = String::new();
        assert!(column.validate().is_err());
    }
}
