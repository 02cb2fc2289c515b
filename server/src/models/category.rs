use chrono::{DateTime, Utc};
use emporium_engine::Queryable;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::borrow::Cow;

use super::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<u64>,
    pub is_active: bool,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Category {
    const COLLECTION: &'static str = "categories";
    const NAME: &'static str = "Category";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Queryable for Category {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        let value = match name {
            "id" => json!(self.id),
            "name" => json!(self.name),
            "slug" => json!(self.slug),
            "description" => json!(self.description),
            "parent_id" => json!(self.parent_id),
            "is_active" => json!(self.is_active),
            "sort_order" => json!(self.sort_order),
            "created_at" => json!(self.created_at),
            "updated_at" => json!(self.updated_at),
            _ => return None,
        };
        Some(Cow::Owned(value))
    }
}
