//! Filters applied before sorting and pagination.
//!
//! Filters combine with logical AND. A field filter naming a field that no
//! element of the source exposes is skipped, so unknown keys never empty a
//! listing.

use crate::value::{compare_values, values_equal, Queryable};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Caller-supplied predicate over a field value.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Condition tested against a single field.
#[derive(Clone)]
pub enum Condition {
    /// Value equality. When the element's field is an array, matches if the
    /// array contains the value.
    Equals(Value),
    /// Inclusive bounds. Either side may be open.
    Range { min: Option<Value>, max: Option<Value> },
    /// Arbitrary predicate.
    Predicate(Predicate),
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Equals(v) => f.debug_tuple("Equals").field(v).finish(),
            Condition::Range { min, max } => f
                .debug_struct("Range")
                .field("min", min)
                .field("max", max)
                .finish(),
            Condition::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl Condition {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Condition::Equals(expected) => match value {
                Value::Array(items) if !expected.is_array() => {
                    items.iter().any(|item| values_equal(item, expected))
                }
                _ => values_equal(value, expected),
            },
            Condition::Range { min, max } => {
                if value.is_null() {
                    return false;
                }
                let above = min
                    .as_ref()
                    .map_or(true, |m| compare_values(value, m) != Ordering::Less);
                let below = max
                    .as_ref()
                    .map_or(true, |m| compare_values(value, m) != Ordering::Greater);
                above && below
            }
            Condition::Predicate(p) => p(value),
        }
    }
}

/// One filter of a query.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Test a named field.
    Field { field: String, condition: Condition },
    /// Case-insensitive substring search, matching if any of the fields
    /// contains the term.
    Search { fields: Vec<String>, term: String },
}

impl Filter {
    /// Keep elements whose field equals `value`.
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Field {
            field: field.into(),
            condition: Condition::Equals(value.into()),
        }
    }

    /// Keep elements whose field lies within the inclusive bounds.
    pub fn range(field: impl Into<String>, min: Option<Value>, max: Option<Value>) -> Self {
        Filter::Field {
            field: field.into(),
            condition: Condition::Range { min, max },
        }
    }

    /// Keep elements whose field satisfies `predicate`.
    pub fn predicate<F>(field: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Filter::Field {
            field: field.into(),
            condition: Condition::Predicate(Arc::new(predicate)),
        }
    }

    /// Case-insensitive substring search across `fields`.
    pub fn search<I, S>(fields: I, term: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::Search {
            fields: fields.into_iter().map(Into::into).collect(),
            term: term.into(),
        }
    }

    fn matches<T: Queryable>(&self, item: &T) -> bool {
        match self {
            Filter::Field { field, condition } => item
                .field(field)
                .is_some_and(|value| condition.matches(&value)),
            Filter::Search { fields, term } => {
                let needle = term.trim().to_lowercase();
                fields.iter().any(|name| {
                    item.field(name)
                        .is_some_and(|value| text_contains(&value, &needle))
                })
            }
        }
    }

    /// Whether this filter constrains anything for the given source.
    fn applies_to<T: Queryable>(&self, source: &[T]) -> bool {
        match self {
            Filter::Field { field, .. } => source.iter().any(|item| item.field(field).is_some()),
            Filter::Search { term, .. } => !term.trim().is_empty(),
        }
    }
}

fn text_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::Array(items) => items.iter().any(|v| text_contains(v, needle)),
        _ => false,
    }
}

/// Keep only the elements matching every applicable filter.
///
/// Output preserves source order.
pub fn filter<'a, T: Queryable>(items: &'a [T], filters: &[Filter]) -> Vec<&'a T> {
    let active: Vec<&Filter> = filters.iter().filter(|f| f.applies_to(items)).collect();

    items
        .iter()
        .filter(|item| active.iter().all(|f| f.matches(*item)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reviews() -> Vec<Value> {
        vec![
            json!({"id": 1, "status": "pending", "rating": 4, "title": "Great Shoes"}),
            json!({"id": 2, "status": "approved", "rating": 2, "title": "meh"}),
            json!({"id": 3, "status": "pending", "rating": 5, "title": "Love these shoes"}),
        ]
    }

    fn ids(items: &[&Value]) -> Vec<i64> {
        items.iter().map(|v| v["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn equals_filter() {
        let data = reviews();
        let out = filter(&data, &[Filter::equals("status", "pending")]);
        assert_eq!(ids(&out), vec![1, 3]);
    }

    #[test]
    fn filters_combine_with_and() {
        let data = reviews();
        let out = filter(
            &data,
            &[
                Filter::equals("status", "pending"),
                Filter::range("rating", Some(json!(5)), None),
            ],
        );
        assert_eq!(ids(&out), vec![3]);
    }

    #[test]
    fn unknown_field_is_ignored() {
        let data = reviews();
        let out = filter(&data, &[Filter::equals("colour", "red")]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn search_is_case_insensitive() {
        let data = reviews();
        let out = filter(&data, &[Filter::search(["title"], "SHOES")]);
        assert_eq!(ids(&out), vec![1, 3]);
    }

    #[test]
    fn search_ors_across_fields() {
        let data = vec![
            json!({"id": 1, "name": "Red Mug", "sku": "MUG-1"}),
            json!({"id": 2, "name": "Blue Cup", "sku": "CUP-RED"}),
            json!({"id": 3, "name": "Plate", "sku": "PL-1"}),
        ];
        let out = filter(&data, &[Filter::search(["name", "sku"], "red")]);
        assert_eq!(ids(&out), vec![1, 2]);
    }

    #[test]
    fn blank_search_matches_everything() {
        let data = reviews();
        assert_eq!(filter(&data, &[Filter::search(["title"], "  ")]).len(), 3);
    }

    #[test]
    fn equals_on_array_is_membership() {
        let data = vec![
            json!({"id": 1, "category_ids": [1, 2]}),
            json!({"id": 2, "category_ids": [3]}),
        ];
        let out = filter(&data, &[Filter::equals("category_ids", 2)]);
        assert_eq!(ids(&out), vec![1]);
    }

    #[test]
    fn range_is_inclusive_and_skips_nulls() {
        let data = vec![
            json!({"id": 1, "price": 10.0}),
            json!({"id": 2, "price": 20}),
            json!({"id": 3, "price": null}),
            json!({"id": 4, "price": 30.5}),
        ];
        let out = filter(
            &data,
            &[Filter::range("price", Some(json!(10)), Some(json!(20)))],
        );
        assert_eq!(ids(&out), vec![1, 2]);
    }

    #[test]
    fn predicate_filter() {
        let data = reviews();
        let out = filter(
            &data,
            &[Filter::predicate("rating", |v| v.as_i64().is_some_and(|r| r % 2 == 0))],
        );
        assert_eq!(ids(&out), vec![1, 2]);
    }

    #[test]
    fn missing_field_on_some_elements_does_not_match() {
        let data = vec![json!({"id": 1, "status": "pending"}), json!({"id": 2})];
        let out = filter(&data, &[Filter::equals("status", "pending")]);
        assert_eq!(ids(&out), vec![1]);
    }
}
