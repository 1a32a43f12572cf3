//! Reusable field checks
//!
//! Each check looks at one normalized column value and explains what is
//! wrong with it. Checks only describe problems; they never reject records.

use crate::core::field::{format_number, FieldValue};

/// Check: field is present
pub fn required() -> impl Fn(&str, &FieldValue) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &FieldValue| {
        if value.is_missing() {
            Err(format!("Missing required field '{}'", field))
        } else {
            Ok(())
        }
    }
}

/// Check: numeric reading is not negative
pub fn non_negative() -> impl Fn(&str, &FieldValue) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &FieldValue| match value.numeric {
        Some(number) if number < 0.0 => Err(format!(
            "'{}' must not be negative (value: {})",
            field,
            format_number(number)
        )),
        // Missing or non-numeric values are another check's concern
        _ => Ok(()),
    }
}

/// Check: year reading is not after `current_year`
pub fn not_after_year(
    current_year: i32,
) -> impl Fn(&str, &FieldValue) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &FieldValue| match value.numeric {
        Some(year) if year > f64::from(current_year) => Err(format!(
            "'{}' is in the future (year: {}, current year: {})",
            field,
            format_number(year),
            current_year
        )),
        _ => Ok(()),
    }
}
