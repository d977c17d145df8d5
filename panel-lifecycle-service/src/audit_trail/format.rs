use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;

/// Placeholder for a missing or null value.
pub const EMPTY_VALUE: &str = "—";

const DATE_FORMAT: &str = "%b %d, %Y";

/// Renders an audit value for display: numbers with two decimals, booleans
/// as Yes/No, dates as `Jan 05, 2024`, null as a dash, anything else verbatim.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => EMPTY_VALUE.to_string(),
        Value::Bool(b) => yes_no(*b).to_string(),
        Value::Number(n) => two_decimals(&n.to_string()).unwrap_or_else(|| n.to_string()),
        Value::String(s) => format_text(s),
        other => other.to_string(),
    }
}

fn format_text(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return EMPTY_VALUE.to_string();
    }
    if let Some(number) = two_decimals(trimmed) {
        return number;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return yes_no(true).to_string();
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return yes_no(false).to_string();
    }
    if let Some(date) = format_date(trimmed) {
        return date;
    }
    s.to_string()
}

fn two_decimals(s: &str) -> Option<String> {
    let mut decimal = Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()?;
    decimal.rescale(2);
    Some(decimal.to_string())
}

fn format_date(s: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.format(DATE_FORMAT).to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.format(DATE_FORMAT).to_string());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.format(DATE_FORMAT).to_string())
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "Yes"
    } else {
        "No"
    }
}
