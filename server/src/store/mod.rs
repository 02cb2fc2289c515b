//! Storage for resource collections.
//!
//! Handlers never touch a backing collection directly. They go through a
//! [`Repository`], which hides whether records live in memory or in
//! PostgreSQL.

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::{create_pool, run_migrations, PgRepository, Pool};

use async_trait::async_trait;

use crate::models::Entity;

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt {collection} record {id}: {source}")]
    Corrupt {
        collection: &'static str,
        id: i64,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A [`Mutation`] refused to apply. The message is meant for clients.
    #[error("{0}")]
    Rejected(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// In-place change applied by [`Repository::modify`]. Returning `Err`
/// leaves the record untouched.
pub type Mutation<T> = Box<dyn FnOnce(&mut T) -> std::result::Result<(), String> + Send>;

/// Create/read/update/delete by id over one collection.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Every record, in ascending id order.
    async fn all(&self) -> Result<Vec<T>>;

    async fn get(&self, id: u64) -> Result<Option<T>>;

    /// Store a new record. The id of `item` is ignored and a fresh one
    /// assigned.
    async fn create(&self, item: T) -> Result<T>;

    /// Replace the record with the same id. Returns `None` if it does not
    /// exist.
    async fn update(&self, item: T) -> Result<Option<T>>;

    /// Read, change and write back one record as a single step; no other
    /// writer sees the record in between. Returns `None` if it does not
    /// exist and [`StoreError::Rejected`] if `mutate` refuses.
    ///
    /// `mutate` must not call back into the repository.
    async fn modify(&self, id: u64, mutate: Mutation<T>) -> Result<Option<T>>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: u64) -> Result<bool>;

    async fn count(&self) -> Result<u64>;
}
