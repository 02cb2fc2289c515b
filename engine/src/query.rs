//! The list-query pipeline: filter, then sort, then paginate.

use crate::error::{Error, Result};
use crate::filter::{filter, Filter};
use crate::page::{paginate, Page};
use crate::sort::{sort, SortSpec};
use crate::value::Queryable;

/// Page size used when a query does not set one.
pub const DEFAULT_PER_PAGE: u64 = 15;

/// Normalized list parameters for one request.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub filters: Vec<Filter>,
    pub sort: Option<SortSpec>,
    pub page: u64,
    pub per_page: u64,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            sort: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl QuerySpec {
    /// Create a spec for the first page with the given page size.
    pub fn new(per_page: u64) -> Self {
        Self {
            per_page,
            ..Self::default()
        }
    }

    /// Add a filter. Filters combine with logical AND.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort_by(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    pub fn per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page;
        self
    }

    /// Validate this query before running it.
    pub fn validate(&self) -> Result<()> {
        if self.per_page == 0 {
            return Err(Error::invalid("per_page must be a positive integer"));
        }
        Ok(())
    }
}

/// Run a query over `source`.
///
/// The order filter → sort → paginate is fixed: it decides which elements
/// land on which page. The source is never mutated; only the items of the
/// returned page are cloned.
pub fn execute<T>(source: &[T], spec: &QuerySpec) -> Result<Page<T>>
where
    T: Queryable + Clone,
{
    spec.validate()?;

    let matched = filter(source, &spec.filters);
    let ordered = match &spec.sort {
        Some(sort_spec) => sort(matched, sort_spec),
        None => matched,
    };

    Ok(paginate(ordered, spec.page, spec.per_page)?.map(T::clone))
}
