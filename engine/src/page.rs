//! Paged results.

use crate::error::{Error, Result};
use serde::Serialize;

/// One slice of a filtered and sorted collection, plus the counts needed to
/// render pagination controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of elements matching the filters, independent of pagination.
    pub total_count: u64,
    pub page_count: u64,
    pub current_page: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    /// Zero-based offset of the first item of this page.
    pub fn offset(&self) -> u64 {
        (self.current_page - 1).saturating_mul(self.per_page)
    }

    /// One-based position of the first item, or `None` for an empty page.
    pub fn from(&self) -> Option<u64> {
        (!self.items.is_empty()).then(|| self.offset() + 1)
    }

    /// One-based position of the last item, or `None` for an empty page.
    pub fn to(&self) -> Option<u64> {
        (!self.items.is_empty()).then(|| self.offset() + self.items.len() as u64)
    }

    /// Last page number for navigation. Never less than 1.
    pub fn last_page(&self) -> u64 {
        self.page_count.max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform the items, keeping the counts.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_count: self.page_count,
            current_page: self.current_page,
            per_page: self.per_page,
        }
    }
}

/// Cut one page out of an already filtered and sorted sequence.
///
/// `page` below 1 is clamped to 1. A page past the end yields no items.
pub fn paginate<T>(items: Vec<T>, page: u64, per_page: u64) -> Result<Page<T>> {
    if per_page == 0 {
        return Err(Error::invalid("per_page must be a positive integer"));
    }

    let current_page = page.max(1);
    let total_count = items.len() as u64;
    let page_count = total_count.div_ceil(per_page);
    let offset = (current_page - 1).saturating_mul(per_page);

    let items = if offset >= total_count {
        Vec::new()
    } else {
        items
            .into_iter()
            .skip(offset as usize)
            .take(per_page as usize)
            .collect()
    };

    Ok(Page {
        items,
        total_count,
        page_count,
        current_page,
        per_page,
    })
}
