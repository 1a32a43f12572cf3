//! Normalized field values shared by filtering, ranking and sorting

use serde::Serialize;
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Display form of an absent or unreadable value
pub const PLACEHOLDER: &str = "—";

/// Display form of a series field that is `false` or absent
pub const NO_SERIES: &str = "None";

/// Case-fold text for comparisons
///
/// Folding is locale independent: surrounding whitespace is trimmed and the
/// Unicode lowercase mapping is applied.
pub fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Read a JSON value as a finite number
///
/// Numbers and numeric strings are accepted. Everything else, including
/// booleans, blank strings and `"NaN"`, is `None` (never `0`).
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Render a number without a trailing `.0` when it is integral
pub fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

/// Render a JSON number the way [`format_number`] does, so `1966` and
/// `1966.0` display alike. Integers keep their exact digits.
pub fn format_json_number(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    number
        .as_f64()
        .map_or_else(|| number.to_string(), format_number)
}

/// A value normalized for ordering
///
/// `Missing` is the sentinel for absent or malformed input. The sort layer
/// always places it after every present value, in both directions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComparableValue {
    Number(f64),
    Text(String),
    Missing,
}

impl ComparableValue {
    /// A number, or `Missing` when it is not finite
    pub fn number(value: f64) -> Self {
        if value.is_finite() {
            ComparableValue::Number(value)
        } else {
            ComparableValue::Missing
        }
    }

    /// Folded text. An empty string stays a present value.
    pub fn text(value: &str) -> Self {
        ComparableValue::Text(fold(value))
    }

    /// Check for the missing sentinel
    pub fn is_missing(&self) -> bool {
        matches!(self, ComparableValue::Missing)
    }

    /// Ascending order between two values
    ///
    /// Numbers come before text when a column mixes both. `Missing` is
    /// greater than everything here; direction handling lives in the sorter.
    pub fn cmp_ascending(&self, other: &Self) -> Ordering {
        use ComparableValue::*;
        match (self, other) {
            (Number(a), Number(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Number(_), Text(_)) => Ordering::Less,
            (Text(_), Number(_)) => Ordering::Greater,
            (Missing, Missing) => Ordering::Equal,
            (Missing, _) => Ordering::Greater,
            (_, Missing) => Ordering::Less,
        }
    }
}

/// The normalized reading of one column for one record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValue {
    /// The untouched JSON value (`Null` when absent)
    pub raw: Value,

    /// Human-readable form
    pub display: String,

    /// Ordering key
    pub sortable: ComparableValue,

    /// Numeric reading used by range and decade filters
    ///
    /// The number itself, a date's year, a list's length or a series order.
    pub numeric: Option<f64>,
}

impl FieldValue {
    /// A value that could not be read
    pub fn missing(raw: Value) -> Self {
        Self {
            raw,
            display: PLACEHOLDER.to_string(),
            sortable: ComparableValue::Missing,
            numeric: None,
        }
    }

    /// A text value sorted by its folded display form
    pub fn text(raw: Value, display: impl Into<String>) -> Self {
        let display = display.into();
        let sortable = ComparableValue::text(&display);
        Self {
            raw,
            display,
            sortable,
            numeric: None,
        }
    }

    /// A numeric value
    pub fn number(raw: Value, number: f64) -> Self {
        Self {
            raw,
            display: format_number(number),
            sortable: ComparableValue::number(number),
            numeric: Some(number).filter(|n| n.is_finite()),
        }
    }

    /// Attach a numeric reading
    pub fn with_numeric(mut self, numeric: Option<f64>) -> Self {
        self.numeric = numeric.filter(|n| n.is_finite());
        self
    }

    /// Check whether the value is the missing sentinel
    pub fn is_missing(&self) -> bool {
        self.sortable.is_missing()
    }

    /// Display form folded for substring and equality matching
    pub fn folded_display(&self) -> String {
        fold(&self.display)
    }
}
