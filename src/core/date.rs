//! Multi-format date parsing for date-like columns

use chrono::{DateTime, NaiveDate, NaiveTime};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Parse a JSON value as a calendar date
///
/// Accepted shapes:
/// - ISO `YYYY-MM-DD`, optionally followed by a time (`2005-03-26T19:00:00Z`)
/// - regional `DD/MM/YYYY`
/// - long form `Month DD, YYYY` (`March 26, 2005`, `Mar 26th 2005`)
/// - bare year `YYYY`, as a string or a JSON integer
///
/// Bare years resolve to January 1st. Anything else is `None`.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => {
            let year = n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            })?;
            year_start(year)
        }
        _ => None,
    }
}

/// Parse a date string (see [`parse_date`])
pub fn parse_date_str(input: &str) -> Option<NaiveDate> {
    let text = input.trim();
    if text.is_empty() {
        return None;
    }

    if bare_year_regex().is_match(text) {
        return year_start(text.parse().ok()?);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    if let Some(date) = parse_iso_prefix(text) {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%d/%m/%Y") {
        return Some(date);
    }
    parse_long_form(text)
}

/// Seconds since the Unix epoch at midnight UTC
pub fn timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// January 1st of a year in `1..=9999`
fn year_start(year: i64) -> Option<NaiveDate> {
    if !(1..=9999).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, 1, 1)
}

/// `YYYY-MM-DD` followed by `T` or a space and a time part
fn parse_iso_prefix(text: &str) -> Option<NaiveDate> {
    let (date, rest) = text.split_at_checked(10)?;
    if !rest.starts_with(['T', ' ']) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// `Month DD, YYYY` with full or abbreviated month names
fn parse_long_form(text: &str) -> Option<NaiveDate> {
    let captures = long_form_regex().captures(text)?;
    let month = month_token_to_number(&captures[1].to_ascii_lowercase())?;
    let day = captures[2].parse::<u32>().ok()?;
    let year = captures[3].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_token_to_number(token: &str) -> Option<u32> {
    let month = match token {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

fn bare_year_regex() -> &'static Regex {
    static BARE_YEAR: OnceLock<Regex> = OnceLock::new();
    BARE_YEAR.get_or_init(|| Regex::new(r"^\d{4}$").expect("bare year pattern is valid"))
}

fn long_form_regex() -> &'static Regex {
    static LONG_FORM: OnceLock<Regex> = OnceLock::new();
    LONG_FORM.get_or_init(|| {
        Regex::new(r"^([A-Za-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})$")
            .expect("long form date pattern is valid")
    })
}
