use chrono::{DateTime, Utc};
use emporium_engine::Queryable;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::borrow::Cow;

use super::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub user_id: u64,
    /// Free-form category such as `order`, `review` or `promotion`.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub data: Value,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn mark_read(&mut self, at: DateTime<Utc>) {
        if !self.is_read {
            self.is_read = true;
            self.read_at = Some(at);
        }
    }
}

impl Entity for Notification {
    const COLLECTION: &'static str = "notifications";
    const NAME: &'static str = "Notification";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl Queryable for Notification {
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        let value = match name {
            "id" => json!(self.id),
            "user_id" => json!(self.user_id),
            "type" => json!(self.kind),
            "title" => json!(self.title),
            "message" => json!(self.message),
            "is_read" => json!(self.is_read),
            "read_at" => json!(self.read_at),
            "created_at" => json!(self.created_at),
            _ => {
                let path = name.strip_prefix("data.")?;
                return emporium_engine::value::lookup_path(&self.data, path).map(Cow::Borrowed);
            }
        };
        Some(Cow::Owned(value))
    }
}
