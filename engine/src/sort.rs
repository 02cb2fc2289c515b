//! Stable sorting by a named field.

use crate::error::{Error, Result};
use crate::value::{compare_with_kind, Queryable, SortKind};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(Error::invalid(format!("unknown sort direction '{}'", other))),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Which field to sort by, in which direction, compared how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
    pub kind: SortKind,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
            kind: SortKind::Natural,
        }
    }

    /// Compare the field as an RFC 3339 timestamp.
    pub fn timestamp(mut self) -> Self {
        self.kind = SortKind::Timestamp;
        self
    }
}

/// Stable sort of `items` by `spec.field`.
///
/// Elements missing the field order before those that have it (ascending).
/// `Desc` reverses the comparator rather than the output, so equal elements
/// keep their input order in both directions. When no element has the field
/// the input order is returned unchanged.
pub fn sort<'a, T: Queryable>(items: Vec<&'a T>, spec: &SortSpec) -> Vec<&'a T> {
    let mut keyed: Vec<_> = items
        .into_iter()
        .map(|item| (item.field(&spec.field), item))
        .collect();

    if keyed.iter().all(|(key, _)| key.is_none()) {
        return keyed.into_iter().map(|(_, item)| item).collect();
    }

    keyed.sort_by(|(a, _), (b, _)| {
        let ord = match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => compare_with_kind(x, y, spec.kind),
        };
        match spec.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });

    keyed.into_iter().map(|(_, item)| item).collect()
}
