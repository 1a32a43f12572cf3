//! Advisory data-quality checks
//!
//! The validation pass reads the base collection through the accessor
//! registry and reports [`ValidationWarning`]s. It never removes or reorders
//! records; the warnings are for a display layer to show next to rows.

pub mod validators;

use crate::core::accessor::AccessorRegistry;
use crate::core::record::Record;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Which columns each check applies to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    /// Columns that must be present
    #[serde(default)]
    pub required: Vec<String>,

    /// Columns whose numeric reading must not be negative
    #[serde(default)]
    pub non_negative: Vec<String>,

    /// Columns whose year must not be after the current year
    #[serde(default)]
    pub no_future: Vec<String>,
}

impl ValidationRules {
    /// Every column key named by a rule
    pub fn referenced_columns(&self) -> impl Iterator<Item = &str> {
        self.required
            .iter()
            .chain(&self.non_negative)
            .chain(&self.no_future)
            .map(String::as_str)
    }
}

/// Inputs of the validation pass that do not come from the data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    /// Years after this one are reported as future dates
    pub current_year: i32,
}

impl ValidationContext {
    pub fn new(current_year: i32) -> Self {
        Self { current_year }
    }
}

impl Default for ValidationContext {
    /// Uses today's year (UTC)
    fn default() -> Self {
        Self::new(Utc::now().year())
    }
}

/// Kind of data-quality issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    MissingField,
    DuplicateId,
    NegativeValue,
    FutureDate,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::MissingField => "MISSING_FIELD",
            WarningCode::DuplicateId => "DUPLICATE_ID",
            WarningCode::NegativeValue => "NEGATIVE_VALUE",
            WarningCode::FutureDate => "FUTURE_DATE",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which record a warning is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    /// Position in the base collection
    pub index: usize,

    /// Identifier display value, when the record has one
    pub id: Option<String>,
}

/// A non-fatal note about one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub record: RecordRef,
    pub code: WarningCode,
    pub message: String,
}

/// Run every rule over the base collection
///
/// Warnings are ordered by record index, then by check: missing fields,
/// duplicate id, negative values, future dates. For duplicate ids the first
/// occurrence is clean and every later occurrence gets one warning. Records
/// without an id never count as duplicates. Rules naming unknown columns
/// are skipped.
pub fn validate(
    records: &[Record],
    registry: &AccessorRegistry,
    id_field: Option<&str>,
    rules: &ValidationRules,
    context: &ValidationContext,
) -> Vec<ValidationWarning> {
    let required = validators::required();
    let non_negative = validators::non_negative();
    let not_future = validators::not_after_year(context.current_year);

    let id_column = id_field.and_then(|key| registry.get(key));
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut warnings = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let id = id_column
            .map(|column| column.extract(record))
            .filter(|value| !value.is_missing())
            .map(|value| value.display);
        let mut warn = |code: WarningCode, message: String| {
            warnings.push(ValidationWarning {
                record: RecordRef {
                    index,
                    id: id.clone(),
                },
                code,
                message,
            });
        };

        for key in &rules.required {
            if let Some(value) = registry.extract(key, record) {
                if let Err(message) = required(key, &value) {
                    warn(WarningCode::MissingField, message);
                }
            }
        }

        if let Some(id) = &id {
            match first_seen.get(id) {
                Some(first) => warn(
                    WarningCode::DuplicateId,
                    format!("Duplicate id '{}' (first seen at record {})", id, first),
                ),
                None => {
                    first_seen.insert(id.clone(), index);
                }
            }
        }

        for key in &rules.non_negative {
            if let Some(value) = registry.extract(key, record) {
                if let Err(message) = non_negative(key, &value) {
                    warn(WarningCode::NegativeValue, message);
                }
            }
        }

        for key in &rules.no_future {
            if let Some(value) = registry.extract(key, record) {
                if let Err(message) = not_future(key, &value) {
                    warn(WarningCode::FutureDate, message);
                }
            }
        }
    }

    if !warnings.is_empty() {
        tracing::debug!(
            warnings = warnings.len(),
            records = records.len(),
            "Validation pass found data-quality issues"
        );
    }
    warnings
}
