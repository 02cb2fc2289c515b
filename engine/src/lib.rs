//! # Emporium Engine
//!
//! The list-query engine behind every Emporium resource listing.
//!
//! Each listing takes an in-memory collection and the request's query
//! parameters and returns one page of results plus the counts needed to
//! render pagination controls. This crate does that once, for every
//! resource, instead of each route re-deriving its own filter/sort/slice.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine never touches storage, the network or the clock
//! - **Pure**: the source collection is only read; the same inputs always
//!   produce the same page
//! - **Fixed order**: filter, then sort, then paginate
//!
//! ## Core Concepts
//!
//! - [`Queryable`] - anything that exposes named fields as JSON values
//! - [`Filter`] - equality, range, predicate and multi-field search filters
//! - [`SortSpec`] - stable sort on one field, natural or chronological
//! - [`QuerySpec`] - filters, sort and page window of one request
//! - [`Page`] - one page of results plus totals
//! - [`envelope`] - Laravel-style `{data, links, meta}` or simple `{data, meta}`
//!
//! ## Quick Start
//!
//! ```rust
//! use emporium_engine::{execute, envelope, Filter, QuerySpec, SortDirection, SortSpec};
//! use serde_json::json;
//!
//! let reviews = vec![
//!     json!({"id": 1, "status": "pending"}),
//!     json!({"id": 2, "status": "approved"}),
//!     json!({"id": 3, "status": "pending"}),
//! ];
//!
//! let spec = QuerySpec::new(10)
//!     .filter(Filter::equals("status", "pending"))
//!     .sort_by(SortSpec::new("id", SortDirection::Desc));
//!
//! let page = execute(&reviews, &spec).unwrap();
//! assert_eq!(page.total_count, 2);
//! assert_eq!(page.items[0]["id"], 3);
//!
//! let body = envelope::laravel(page, "/api/reviews");
//! assert_eq!(body.links.first, "/api/reviews?page=1");
//! ```

pub mod envelope;
pub mod error;
pub mod filter;
pub mod page;
pub mod params;
pub mod query;
pub mod sort;
pub mod value;

// Re-export main types at crate root
pub use envelope::{Envelope, EnvelopeStyle, Formatted, SimpleEnvelope};
pub use error::{Error, Result};
pub use filter::{filter, Condition, Filter, Predicate};
pub use page::{paginate, Page};
pub use params::{parse_bool, parse_number, QueryParams};
pub use query::{execute, QuerySpec, DEFAULT_PER_PAGE};
pub use sort::{sort, SortDirection, SortSpec};
pub use value::{compare_values, Queryable, SortKind};
