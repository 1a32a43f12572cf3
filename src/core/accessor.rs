//! Field accessors and the column registry
//!
//! Every column has exactly one accessor. Filtering, relevance ranking,
//! sorting and validation all read records through this registry, so the
//! edge-case rules below apply the same way everywhere:
//!
//! - absent, `null` or malformed input yields [`FieldValue::missing`]
//! - person objects render as `name (role)` with [`PLACEHOLDER`] for a
//!   missing half
//! - series render as `None`, `name` or `name (#order)`
//! - an empty list is a present, empty value
//! - dates accept the shapes documented in [`crate::core::date`]

use crate::core::column::{ColumnDef, FieldKind, FlagLabels, PersonKeys};
use crate::core::date::{parse_date, timestamp};
use crate::core::field::{
    coerce_number, format_json_number, format_number, ComparableValue, FieldValue, NO_SERIES,
    PLACEHOLDER,
};
use crate::core::record::Record;
use chrono::Datelike;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Extracts and normalizes one column from a record
///
/// Implementations must never panic: malformed input degrades to a missing
/// value. Any `Fn(&Record) -> FieldValue` closure is an accessor.
pub trait FieldAccessor: Send + Sync {
    fn extract(&self, record: &Record) -> FieldValue;
}

impl<F> FieldAccessor for F
where
    F: Fn(&Record) -> FieldValue + Send + Sync,
{
    fn extract(&self, record: &Record) -> FieldValue {
        self(record)
    }
}

/// The built-in accessor driven by a [`ColumnDef`]
#[derive(Debug, Clone)]
pub struct ColumnAccessor {
    def: ColumnDef,
}

impl ColumnAccessor {
    pub fn new(def: ColumnDef) -> Self {
        Self { def }
    }
}

impl FieldAccessor for ColumnAccessor {
    fn extract(&self, record: &Record) -> FieldValue {
        let Some(raw) = record.lookup_any(self.def.paths()) else {
            return match self.def.kind {
                FieldKind::Series => no_series(Value::Null),
                _ => FieldValue::missing(Value::Null),
            };
        };

        let raw = raw.clone();
        match self.def.kind {
            FieldKind::Text => text_value(raw),
            FieldKind::Number => number_value(raw),
            FieldKind::Date => date_value(raw),
            FieldKind::Person => {
                let default_keys = PersonKeys::default();
                person_value(raw, self.def.person.as_ref().unwrap_or(&default_keys))
            }
            FieldKind::Series => series_value(raw),
            FieldKind::List => list_value(raw, self.def.item_key.as_deref()),
            FieldKind::Count => count_value(raw),
            FieldKind::Flag => {
                let default_labels = FlagLabels::default();
                flag_value(raw, self.def.flag.as_ref().unwrap_or(&default_labels))
            }
        }
    }
}

/// Non-blank string content of a value
fn non_blank(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(format_json_number(n)),
        _ => None,
    }
}

fn text_value(raw: Value) -> FieldValue {
    let display = match &raw {
        Value::String(s) if s.trim().is_empty() => return FieldValue::missing(raw),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => format_json_number(n),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => join_items(items, None),
        Value::Object(map) => match non_blank(map.get("name")) {
            Some(name) => name,
            None => return FieldValue::missing(raw),
        },
        Value::Null => return FieldValue::missing(raw),
    };
    let numeric = coerce_number(&raw);
    FieldValue::text(raw, display).with_numeric(numeric)
}

fn number_value(raw: Value) -> FieldValue {
    match coerce_number(&raw) {
        Some(number) => FieldValue::number(raw, number),
        None => FieldValue::missing(raw),
    }
}

fn date_value(raw: Value) -> FieldValue {
    let Some(date) = parse_date(&raw) else {
        return FieldValue::missing(raw);
    };
    let year = date.year();
    FieldValue {
        raw,
        display: year.to_string(),
        sortable: ComparableValue::Number(timestamp(date) as f64),
        numeric: Some(f64::from(year)),
    }
}

fn person_value(raw: Value, keys: &PersonKeys) -> FieldValue {
    let (name, role) = match &raw {
        Value::Object(map) => (
            non_blank(map.get(&keys.name_key)),
            non_blank(map.get(&keys.role_key)),
        ),
        Value::String(s) if !s.trim().is_empty() => {
            let display = s.trim().to_string();
            return FieldValue::text(raw, display);
        }
        _ => return FieldValue::missing(raw),
    };

    if name.is_none() && role.is_none() {
        return FieldValue::missing(raw);
    }

    let display = format!(
        "{} ({})",
        name.as_deref().unwrap_or(PLACEHOLDER),
        role.as_deref().unwrap_or(PLACEHOLDER)
    );
    FieldValue::text(raw, display)
}

fn no_series(raw: Value) -> FieldValue {
    FieldValue {
        raw,
        display: NO_SERIES.to_string(),
        sortable: ComparableValue::Missing,
        numeric: None,
    }
}

fn series_value(raw: Value) -> FieldValue {
    match &raw {
        Value::String(s) if !s.trim().is_empty() => {
            let display = s.trim().to_string();
            FieldValue::text(raw, display)
        }
        Value::Number(_) => number_value(raw),
        Value::Object(map) => series_object(map).map_or_else(
            || no_series(raw.clone()),
            |(display, order)| FieldValue::text(raw.clone(), display).with_numeric(order),
        ),
        _ => no_series(raw),
    }
}

fn series_object(map: &Map<String, Value>) -> Option<(String, Option<f64>)> {
    let name = non_blank(map.get("name"))?;
    let order = map.get("order").and_then(coerce_number);
    let display = match order {
        Some(order) => format!("{} (#{})", name, format_number(order)),
        None => name,
    };
    Some((display, order))
}

/// Display text of one list item
fn item_text(item: &Value, item_key: Option<&str>) -> Option<String> {
    match item {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(format_json_number(n)),
        Value::Object(map) => item_key
            .and_then(|key| non_blank(map.get(key)))
            .or_else(|| non_blank(map.get("name")))
            .or_else(|| non_blank(map.get("actor"))),
        _ => None,
    }
}

fn join_items(items: &[Value], item_key: Option<&str>) -> String {
    items
        .iter()
        .filter_map(|item| item_text(item, item_key))
        .collect::<Vec<_>>()
        .join(", ")
}

fn list_value(raw: Value, item_key: Option<&str>) -> FieldValue {
    match &raw {
        Value::Array(items) => {
            let display = join_items(items, item_key);
            let len = items.len() as f64;
            FieldValue::text(raw, display).with_numeric(Some(len))
        }
        Value::String(s) if !s.trim().is_empty() => {
            let display = s.trim().to_string();
            FieldValue::text(raw, display).with_numeric(Some(1.0))
        }
        _ => FieldValue::missing(raw),
    }
}

fn count_value(raw: Value) -> FieldValue {
    match &raw {
        Value::Array(items) => {
            let len = items.len() as f64;
            FieldValue::number(raw, len)
        }
        _ => FieldValue::missing(raw),
    }
}

fn flag_value(raw: Value, labels: &FlagLabels) -> FieldValue {
    let flag = match &raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };

    match flag {
        Some(flag) => {
            let number = if flag { 1.0 } else { 0.0 };
            let label = if flag {
                &labels.true_label
            } else {
                &labels.false_label
            };
            FieldValue {
                raw,
                display: label.clone(),
                sortable: ComparableValue::Number(number),
                numeric: Some(number),
            }
        }
        None => FieldValue::missing(raw),
    }
}

/// A column registered with its accessor
#[derive(Clone)]
pub struct RegisteredColumn {
    pub def: ColumnDef,
    accessor: Arc<dyn FieldAccessor>,
}

impl RegisteredColumn {
    pub fn extract(&self, record: &Record) -> FieldValue {
        self.accessor.extract(record)
    }
}

impl fmt::Debug for RegisteredColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredColumn")
            .field("def", &self.def)
            .finish_non_exhaustive()
    }
}

/// Ordered map from column key to accessor
///
/// Registration order is display order. Registering a key twice replaces
/// the earlier accessor in place.
#[derive(Debug, Clone, Default)]
pub struct AccessorRegistry {
    columns: IndexMap<String, RegisteredColumn>,
}

impl AccessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry of built-in accessors
    pub fn from_columns(defs: impl IntoIterator<Item = ColumnDef>) -> Self {
        let mut registry = Self::new();
        for def in defs {
            registry.register(def);
        }
        registry
    }

    /// Register a column read by the built-in accessor
    pub fn register(&mut self, def: ColumnDef) -> &mut Self {
        let accessor = ColumnAccessor::new(def.clone());
        self.register_custom(def, accessor)
    }

    /// Register a column with its own accessor
    ///
    /// The definition still supplies the key, label, filter kind and
    /// searchability; its path and kind are ignored.
    pub fn register_custom(
        &mut self,
        def: ColumnDef,
        accessor: impl FieldAccessor + 'static,
    ) -> &mut Self {
        let column = RegisteredColumn {
            def,
            accessor: Arc::new(accessor),
        };
        self.columns.insert(column.def.key.clone(), column);
        self
    }

    pub fn get(&self, key: &str) -> Option<&RegisteredColumn> {
        self.columns.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.columns.contains_key(key)
    }

    /// Read one column of a record, `None` for an unknown key
    pub fn extract(&self, key: &str, record: &Record) -> Option<FieldValue> {
        self.get(key).map(|column| column.extract(record))
    }

    /// All columns in registration order
    pub fn columns(&self) -> impl Iterator<Item = &RegisteredColumn> {
        self.columns.values()
    }

    /// Columns shown to the user
    pub fn visible_columns(&self) -> impl Iterator<Item = &RegisteredColumn> {
        self.columns().filter(|column| column.def.visible)
    }

    /// Columns looked at by free-text search
    pub fn searchable_columns(&self) -> impl Iterator<Item = &RegisteredColumn> {
        self.columns().filter(|column| column.def.searchable)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
