//! Catalog products.

use chrono::{DateTime, Utc};
use emporium_engine::Queryable;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::borrow::Cow;
use std::str::FromStr;

use super::Entity;

/// Publication state of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ProductStatus::Draft),
            "active" => Ok(ProductStatus::Active),
            "archived" => Ok(ProductStatus::Archived),
            other => Err(format!("unknown product status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub description: Option<String>,
    pub price: f64,
    pub compare_at_price: Option<f64>,
    pub stock: i64,
    pub status: ProductStatus,
    pub is_active: bool,
    pub category_ids: Vec<u64>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether customers can see and order this product.
    pub fn is_purchasable(&self) -> bool {
        self.is_active && self.status == ProductStatus::Active
    }
}

impl Entity for Product {
    const COLLECTION: &'static str = "products";
    const NAME: &'static str = "Product";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Queryable for Product {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        let value = match name {
            "id" => json!(self.id),
            "name" => json!(self.name),
            "slug" => json!(self.slug),
            "sku" => json!(self.sku),
            "description" => json!(self.description),
            "price" => json!(self.price),
            "compare_at_price" => json!(self.compare_at_price),
            "stock" => json!(self.stock),
            "status" => json!(self.status),
            "is_active" => json!(self.is_active),
            "category_ids" => json!(self.category_ids),
            "created_at" => json!(self.created_at),
            "updated_at" => json!(self.updated_at),
            _ => return None,
        };
        Some(Cow::Owned(value))
    }
}
