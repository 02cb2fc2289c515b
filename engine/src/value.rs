//! Field access and value comparison.
//!
//! The engine never knows the concrete shape of the elements it lists. It
//! only asks them for named fields through [`Queryable`] and compares the
//! JSON values it gets back.

use serde_json::Value;
use std::borrow::Cow;
use std::cmp::Ordering;

/// An element the engine can filter and sort.
///
/// Implementors return the value of a named field, or `None` when the
/// element has no such field. Dot-separated names address nested objects.
pub trait Queryable {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>>;
}

impl Queryable for Value {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        lookup_path(self, name).map(Cow::Borrowed)
    }
}

impl<T: Queryable + ?Sized> Queryable for &T {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        (**self).field(name)
    }
}

/// Resolve a dot-separated path inside a JSON value.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// How values of a sort field are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKind {
    /// Numbers numerically, strings lexicographically (case-sensitive),
    /// booleans `false < true`.
    #[default]
    Natural,
    /// RFC 3339 strings compared chronologically. Values that do not parse
    /// fall back to natural ordering.
    Timestamp,
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_numbers(a: &serde_json::Number, b: &serde_json::Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    let x = a.as_f64().unwrap_or(f64::NAN);
    let y = b.as_f64().unwrap_or(f64::NAN);
    x.total_cmp(&y)
}

/// Total order over JSON values.
///
/// Values of different JSON types order by type
/// (`null < bool < number < string < array < object`). Arrays compare
/// element-wise; objects compare by their serialized form.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                let ord = compare_values(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(_), Value::Object(_)) => a.to_string().cmp(&b.to_string()),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Compare two values under the given sort kind.
pub fn compare_with_kind(a: &Value, b: &Value, kind: SortKind) -> Ordering {
    match kind {
        SortKind::Natural => compare_values(a, b),
        SortKind::Timestamp => match (parse_timestamp(a), parse_timestamp(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => compare_values(a, b),
        },
    }
}

fn parse_timestamp(value: &Value) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    value
        .as_str()
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
}

/// Value equality as used by `Equals` filters.
///
/// Numbers are equal when numerically equal (`1 == 1.0`). Everything else
/// uses structural equality.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Ordering::Equal,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_nested_path() {
        let doc = json!({"shipping": {"city": "Lagos"}, "tags": ["a", "b"]});
        assert_eq!(lookup_path(&doc, "shipping.city"), Some(&json!("Lagos")));
        assert_eq!(lookup_path(&doc, "tags.1"), Some(&json!("b")));
        assert_eq!(lookup_path(&doc, "shipping.zip"), None);
        assert_eq!(lookup_path(&doc, "tags.x"), None);
    }

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(compare_values(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(compare_values(&json!(2.5), &json!(2)), Ordering::Greater);
        assert_eq!(compare_values(&json!(-1), &json!(u64::MAX)), Ordering::Less);
        assert!(values_equal(&json!(1), &json!(1.0)));
    }

    #[test]
    fn strings_compare_case_sensitive() {
        assert_eq!(compare_values(&json!("B"), &json!("a")), Ordering::Less);
        assert_eq!(compare_values(&json!("apple"), &json!("apricot")), Ordering::Less);
    }

    #[test]
    fn mixed_types_order_by_type() {
        assert_eq!(compare_values(&Value::Null, &json!(false)), Ordering::Less);
        assert_eq!(compare_values(&json!(true), &json!(0)), Ordering::Less);
        assert_eq!(compare_values(&json!(99), &json!("1")), Ordering::Less);
    }

    #[test]
    fn timestamps_compare_chronologically() {
        // Same instant, different offsets: lexicographic order disagrees.
        let a = json!("2024-01-01T10:00:00+02:00");
        let b = json!("2024-01-01T09:00:00Z");
        assert_eq!(compare_values(&a, &b), Ordering::Greater);
        assert_eq!(compare_with_kind(&a, &b, SortKind::Timestamp), Ordering::Less);
    }

    #[test]
    fn unparseable_timestamps_fall_back() {
        let a = json!("not a date");
        let b = json!("2024-01-01T09:00:00Z");
        assert_eq!(
            compare_with_kind(&a, &b, SortKind::Timestamp),
            compare_values(&a, &b)
        );
    }
}
