//! Records: one row of a dataset

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single dataset row (a book, an episode, ...)
///
/// Records are opaque JSON objects. Nothing about their shape is guaranteed:
/// fields may be absent, `null`, nested objects, arrays or tri-state unions.
/// All interpretation happens in the accessor layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    /// Wrap a JSON value as a record
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Look up a field by dotted path (`"award.year"`)
    ///
    /// `null` is reported the same way as an absent field. Numeric segments
    /// index into arrays (`"cast.0.name"`).
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut current = &self.0;
        for segment in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        (!current.is_null()).then_some(current)
    }

    /// Look up the first present path
    pub fn lookup_any<'a, I>(&self, paths: I) -> Option<&Value>
    where
        I: IntoIterator<Item = &'a str>,
    {
        paths.into_iter().find_map(|path| self.lookup(path))
    }

    /// Borrow the underlying JSON value
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume the record, returning the JSON value
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
