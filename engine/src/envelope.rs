//! Response envelopes around a [`Page`].
//!
//! Two shapes are in use by API clients and both are kept:
//!
//! - Laravel style: `{data, links: {first, last, prev, next}, meta: {...}}`
//! - Simple style: `{data, meta: {current_page, last_page, per_page, total}}`

use crate::page::Page;
use serde::{Deserialize, Serialize};

/// Which envelope a listing responds with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStyle {
    #[default]
    Laravel,
    Simple,
}

/// Navigation links of a Laravel paginator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    pub first: String,
    pub last: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// Paginator metadata of a Laravel paginator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub current_page: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub last_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub path: String,
}

/// Laravel-style envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Vec<T>,
    pub links: Links,
    pub meta: Meta,
}

/// Metadata of the simple envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleMeta {
    pub current_page: u64,
    pub last_page: u64,
    pub per_page: u64,
    pub total: u64,
}

/// Envelope without navigation links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleEnvelope<T> {
    pub data: Vec<T>,
    pub meta: SimpleMeta,
}

/// Either envelope, chosen per resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Formatted<T> {
    Laravel(Envelope<T>),
    Simple(SimpleEnvelope<T>),
}

fn page_url(path: &str, page: u64) -> String {
    format!("{}?page={}", path, page)
}

/// Wrap a page in the Laravel paginator shape.
///
/// `path` is the request path without query string, supplied by the caller.
/// `last` points at the last page that exists, or page 1 when nothing
/// matched. `prev` and `next` are `None` when they would leave that range.
///
/// Unlike Laravel, which links `prev` to `current_page - 1` even past the
/// end, a page beyond `last_page` links `prev` to `last_page` itself.
pub fn laravel<T>(page: Page<T>, path: &str) -> Envelope<T> {
    let last_page = page.last_page();
    let current = page.current_page;

    let prev = (current > 1).then(|| page_url(path, (current - 1).min(last_page)));
    let next = (current < last_page).then(|| page_url(path, current + 1));

    let meta = Meta {
        current_page: current,
        from: page.from(),
        to: page.to(),
        last_page,
        per_page: page.per_page,
        total: page.total_count,
        path: path.to_string(),
    };

    Envelope {
        links: Links {
            first: page_url(path, 1),
            last: page_url(path, last_page),
            prev,
            next,
        },
        meta,
        data: page.items,
    }
}

/// Wrap a page in the simple `{data, meta}` shape.
pub fn simple<T>(page: Page<T>) -> SimpleEnvelope<T> {
    SimpleEnvelope {
        meta: SimpleMeta {
            current_page: page.current_page,
            last_page: page.last_page(),
            per_page: page.per_page,
            total: page.total_count,
        },
        data: page.items,
    }
}

/// Wrap a page in the envelope selected by `style`.
pub fn format<T>(page: Page<T>, path: &str, style: EnvelopeStyle) -> Formatted<T> {
    match style {
        EnvelopeStyle::Laravel => Formatted::Laravel(laravel(page, path)),
        EnvelopeStyle::Simple => Formatted::Simple(simple(page)),
    }
}
