use std::collections::BTreeSet;

use panel_lifecycle_api::domain::AuditChange;
use serde_json::{Map, Value};

use super::format::format_value;

/// Bookkeeping fields that never show up as a change.
pub const STRUCTURAL_FIELDS: [&str; 12] = [
    "Id",
    "Version",
    "CreatedBy",
    "CreatedAt",
    "CreatedDate",
    "ModifiedBy",
    "ModifiedAt",
    "ModifiedDate",
    "LastModifiedBy",
    "LastModifiedAt",
    "Hash",
    "AuditLogId",
];

pub fn is_structural(field: &str) -> bool {
    let compact: String = field.chars().filter(|c| *c != '_').collect();
    STRUCTURAL_FIELDS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(&compact))
}

/// Splits the two snapshots into the `(old, new)` objects holding only the
/// non-structural fields whose values differ. Both are empty when nothing
/// changed.
pub fn changed_fields(before: &Value, after: &Value) -> (Map<String, Value>, Map<String, Value>) {
    let mut old = Map::new();
    let mut new = Map::new();
    for key in union_keys(Some(before), Some(after)) {
        if is_structural(&key) {
            continue;
        }
        let before_value = field(Some(before), &key);
        let after_value = field(Some(after), &key);
        if normalize(&before_value) != normalize(&after_value) {
            if !before_value.is_null() {
                old.insert(key.clone(), before_value);
            }
            if !after_value.is_null() {
                new.insert(key, after_value);
            }
        }
    }
    (old, new)
}

/// Display rows for a stored record, ordered by field name.
pub fn display_changes(old: Option<&Value>, new: Option<&Value>) -> Vec<AuditChange> {
    union_keys(old, new)
        .into_iter()
        .filter(|key| !is_structural(key))
        .filter_map(|key| {
            let old_value = field(old, &key);
            let new_value = field(new, &key);
            (normalize(&old_value) != normalize(&new_value)).then(|| AuditChange {
                field: humanize(&key),
                old_value: format_value(&old_value),
                new_value: format_value(&new_value),
            })
        })
        .collect()
}

/// `PanelStatus` -> `Panel Status`, `QRCode` -> `QR Code`,
/// `first_approval_by` -> `First Approval By`.
pub fn humanize(field: &str) -> String {
    if field.contains('_') {
        return field
            .split('_')
            .filter(|word| !word.is_empty())
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ");
    }

    let chars: Vec<char> = field.chars().collect();
    let mut out = String::with_capacity(field.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let word_start = prev.is_lowercase() || prev.is_ascii_digit();
            if word_start || (prev.is_uppercase() && next_is_lower) {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn union_keys(a: Option<&Value>, b: Option<&Value>) -> BTreeSet<String> {
    [a, b]
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .flat_map(|object| object.keys().cloned())
        .collect()
}

fn field(object: Option<&Value>, key: &str) -> Value {
    object
        .and_then(|o| o.get(key))
        .cloned()
        .unwrap_or(Value::Null)
}

/// Missing and null compare equal; strings compare by content so that
/// `"5"` and `5` are the same value.
fn normalize(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
