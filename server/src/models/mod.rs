//! Resource models.
//!
//! Every resource is an [`Entity`]: it has a numeric id, lives in a named
//! collection, and exposes its fields to the list-query engine through
//! [`Queryable`](emporium_engine::Queryable).

mod category;
mod notification;
mod order;
mod product;
mod review;
mod user;

pub use category::*;
pub use notification::*;
pub use order::*;
pub use product::*;
pub use review::*;
pub use user::*;

use emporium_engine::Queryable;
use serde::{de::DeserializeOwned, Serialize};

/// A stored resource.
pub trait Entity:
    Queryable + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Collection name used by storage and in log lines.
    const COLLECTION: &'static str;

    /// Singular display name used in error messages.
    const NAME: &'static str;

    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);
}

/// Round a money amount to cents.
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// URL slug from a display name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs() {
        assert_eq!(slugify("Running Shoes"), "running-shoes");
        assert_eq!(slugify("  Men's  T-Shirts! "), "men-s-t-shirts");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn money_rounding() {
        assert_eq!(round_money(12.3456), 12.35);
        assert_eq!(round_money(0.1 + 0.2), 0.3);
    }
}
