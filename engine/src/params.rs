//! Raw list parameters as they arrive in a query string.
//!
//! Callers deserialize [`QueryParams`] from the request and then decide
//! which of the extra keys become filters. The parsing helpers here keep the
//! lenient behavior clients rely on: a missing or garbled `page` means page
//! 1, while a bad page size or numeric filter is rejected.

use crate::error::{Error, Result};
use crate::sort::SortDirection;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Query-string parameters shared by every listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParams {
    pub search: Option<String>,
    pub page: Option<String>,
    /// Page size. `per_page` is accepted as an alias.
    #[serde(alias = "per_page")]
    pub limit: Option<String>,
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
    #[serde(rename = "sortedBy")]
    pub sorted_by: Option<String>,
    /// Resource-specific filter keys (`status`, `min_price`, ...).
    #[serde(flatten)]
    pub extra: HashMap<String, String>,
}

impl QueryParams {
    /// Requested page, defaulting to 1 when absent, unparseable or below 1.
    pub fn page(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    /// Requested page size, `default` when absent, capped at `max`.
    pub fn per_page(&self, default: u64, max: u64) -> Result<u64> {
        let Some(raw) = non_blank(self.limit.as_deref()) else {
            return Ok(default);
        };
        let per_page = raw
            .parse::<i64>()
            .map_err(|_| Error::invalid(format!("limit must be an integer, got '{}'", raw)))?;
        if per_page <= 0 {
            return Err(Error::invalid("limit must be a positive integer"));
        }
        Ok((per_page as u64).min(max))
    }

    /// Trimmed search term, if any.
    pub fn search_term(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }

    /// Requested sort field, if any.
    pub fn order_field(&self) -> Option<&str> {
        non_blank(self.order_by.as_deref())
    }

    /// Requested sort direction. Absent means `default`.
    pub fn direction(&self, default: SortDirection) -> Result<SortDirection> {
        match non_blank(self.sorted_by.as_deref()) {
            Some(raw) => raw.parse(),
            None => Ok(default),
        }
    }

    /// A resource-specific key, trimmed, ignoring blank values.
    pub fn get(&self, key: &str) -> Option<&str> {
        non_blank(self.extra.get(key).map(String::as_str))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a numeric filter value.
pub fn parse_number(key: &str, raw: &str) -> Result<Value> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(Value::from(n));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::from)
        .ok_or_else(|| Error::invalid(format!("{} must be numeric, got '{}'", key, raw)))
}

/// Parse a boolean filter value. Accepts `true/false`, `1/0`, `yes/no`.
pub fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(Error::invalid(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
