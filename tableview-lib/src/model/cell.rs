//! Cell value coercion and ordering.
//!
//! Every stage that looks at a cell as text (filtering, export, the default
//! formatter) goes through [`stringify`], and every stage that orders cells
//! goes through [`compare`], so the table behaves the same everywhere.

use std::cmp::Ordering;

use serde_json::Value;

/// Converts a cell value to its display string.
///
/// - missing or `null` → empty string
/// - strings → as is
/// - numbers and booleans → their natural form
/// - arrays and objects → canonical JSON (object keys sorted)
pub fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => canonical_json(other),
    }
}

/// Serializes a value as JSON with object keys in sorted order, at every
/// level of nesting.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(&mut out, value);
    out
}

fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(out, item);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Returns `true` if the cell's string form contains `needle`, ignoring case.
///
/// `needle` must already be lowercased.
pub fn contains_ignore_case(value: Option<&Value>, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    stringify(value).to_lowercase().contains(needle)
}

/// Orders two cell values.
///
/// Missing and `null` values sort first. Numbers compare numerically, strings
/// lexicographically, booleans `false < true`. Values of different kinds are
/// ordered by kind: null, bool, number, string, array, object. Arrays and
/// objects compare by their canonical JSON text.
pub fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);

    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
            canonical_json(a).cmp(&canonical_json(b))
        }
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn compare_numbers(x: &serde_json::Number, y: &serde_json::Number) -> Ordering {
    if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
        return x.cmp(&y);
    }
    let x = x.as_f64().unwrap_or(f64::NAN);
    let y = y.as_f64().unwrap_or(f64::NAN);
    x.total_cmp(&y)
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
