//! Request handlers for resource operations.

mod auth;
mod categories;
mod listing;
mod notifications;
mod orders;
mod products;
mod reviews;

pub use auth::*;
pub use categories::*;
pub use listing::*;
pub use notifications::*;
pub use orders::*;
pub use products::*;
pub use reviews::*;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, Result};
use crate::models::Entity;
use crate::store::Repository;

/// Single-resource response body, `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Fetch a record or fail with 404.
pub(crate) async fn find<T: Entity>(repo: &dyn Repository<T>, id: u64) -> Result<T> {
    repo.get(id)
        .await?
        .ok_or_else(|| AppError::not_found(T::NAME, id))
}

/// Write back a record that was just read, failing with 404 if it vanished
/// in between.
pub(crate) async fn save<T: Entity>(repo: &dyn Repository<T>, item: T) -> Result<T> {
    let id = item.id();
    repo.update(item)
        .await?
        .ok_or_else(|| AppError::not_found(T::NAME, id))
}

/// Trimmed, non-empty text or a validation error naming `field`.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("The {} field is required.", field)));
    }
    Ok(trimmed.to_string())
}

/// For `Option<Option<T>>` fields with `#[serde(default)]`: an absent key
/// stays `None`, an explicit `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
