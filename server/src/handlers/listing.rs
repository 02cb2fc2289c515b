//! Shared listing for every resource.
//!
//! A [`ResourceListing`] describes which query-string keys a resource
//! understands. [`list_resource`] turns the request's [`QueryParams`] into a
//! [`QuerySpec`], runs it through the engine and wraps the page in the
//! resource's envelope.

use emporium_engine::{
    envelope, execute, parse_bool, parse_number, EnvelopeStyle, Filter, Formatted, QueryParams,
    QuerySpec, Queryable, SortDirection, SortSpec,
};
use serde_json::Value;

use crate::error::Result;

/// How a filter parameter's text is turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    Number,
    Bool,
}

/// A query-string key that filters on a field by equality.
#[derive(Debug, Clone, Copy)]
pub struct FilterParam {
    pub param: &'static str,
    pub field: &'static str,
    pub kind: ParamKind,
}

impl FilterParam {
    pub const fn text(param: &'static str, field: &'static str) -> Self {
        Self { param, field, kind: ParamKind::Text }
    }

    pub const fn number(param: &'static str, field: &'static str) -> Self {
        Self { param, field, kind: ParamKind::Number }
    }

    pub const fn boolean(param: &'static str, field: &'static str) -> Self {
        Self { param, field, kind: ParamKind::Bool }
    }
}

/// A pair of query-string keys bounding a numeric field.
#[derive(Debug, Clone, Copy)]
pub struct RangeParam {
    pub min: &'static str,
    pub max: &'static str,
    pub field: &'static str,
}

/// Listing behavior of one resource.
#[derive(Debug, Clone, Copy)]
pub struct ResourceListing {
    pub default_per_page: u64,
    pub max_per_page: u64,
    pub default_sort: (&'static str, SortDirection),
    pub search_fields: &'static [&'static str],
    /// Fields holding RFC 3339 timestamps, sorted chronologically.
    pub timestamp_fields: &'static [&'static str],
    pub filters: &'static [FilterParam],
    pub ranges: &'static [RangeParam],
    pub style: EnvelopeStyle,
}

impl ResourceListing {
    fn sort_spec(&self, field: &str, direction: SortDirection) -> SortSpec {
        let spec = SortSpec::new(field, direction);
        if self.timestamp_fields.contains(&field) {
            spec.timestamp()
        } else {
            spec
        }
    }

    /// Build the engine query for a request. Keys the resource does not
    /// declare are ignored.
    pub fn query_spec(&self, params: &QueryParams) -> emporium_engine::Result<QuerySpec> {
        let per_page = params.per_page(self.default_per_page, self.max_per_page)?;
        let mut spec = QuerySpec::new(per_page).page(params.page());

        if let Some(term) = params.search_term() {
            spec = spec.filter(Filter::search(self.search_fields.iter().copied(), term));
        }

        for filter in self.filters {
            let Some(raw) = params.get(filter.param) else {
                continue;
            };
            let value = match filter.kind {
                ParamKind::Text => Value::String(raw.to_string()),
                ParamKind::Number => parse_number(filter.param, raw)?,
                ParamKind::Bool => Value::Bool(parse_bool(filter.param, raw)?),
            };
            spec = spec.filter(Filter::equals(filter.field, value));
        }

        for range in self.ranges {
            let min = params
                .get(range.min)
                .map(|raw| parse_number(range.min, raw))
                .transpose()?;
            let max = params
                .get(range.max)
                .map(|raw| parse_number(range.max, raw))
                .transpose()?;
            if min.is_some() || max.is_some() {
                spec = spec.filter(Filter::range(range.field, min, max));
            }
        }

        let (default_field, default_direction) = self.default_sort;
        let sort = match params.order_field() {
            Some(field) => self.sort_spec(field, params.direction(SortDirection::Asc)?),
            None => self.sort_spec(default_field, params.direction(default_direction)?),
        };

        Ok(spec.sort_by(sort))
    }
}

/// List `items` for a request to `path`.
pub fn list_resource<T>(
    items: &[T],
    params: &QueryParams,
    listing: &ResourceListing,
    path: &str,
) -> Result<Formatted<T>>
where
    T: Queryable + Clone,
{
    let spec = listing.query_spec(params)?;
    let page = execute(items, &spec)?;

    tracing::debug!(
        path,
        total = page.total_count,
        page = page.current_page,
        returned = page.items.len(),
        "listed resources"
    );

    Ok(envelope::format(page, path, listing.style))
}
