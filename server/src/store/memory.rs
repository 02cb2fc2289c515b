//! In-memory repository.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{Mutation, Repository, Result, StoreError};
use crate::models::Entity;

/// Records held in a concurrent map keyed by id.
#[derive(Debug)]
pub struct MemoryRepository<T: Entity> {
    records: DashMap<u64, T>,
    next_id: AtomicU64,
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MemoryRepository<T> {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create an empty repository wrapped in Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn all(&self) -> Result<Vec<T>> {
        let mut items: Vec<T> = self.records.iter().map(|e| e.value().clone()).collect();
        items.sort_by_key(|item| item.id());
        Ok(items)
    }

    async fn get(&self, id: u64) -> Result<Option<T>> {
        Ok(self.records.get(&id).map(|e| e.value().clone()))
    }

    async fn create(&self, mut item: T) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        item.set_id(id);
        self.records.insert(id, item.clone());
        tracing::debug!(collection = T::COLLECTION, id, "record created");
        Ok(item)
    }

    async fn update(&self, item: T) -> Result<Option<T>> {
        match self.records.get_mut(&item.id()) {
            Some(mut entry) => {
                *entry = item.clone();
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    async fn modify(&self, id: u64, mutate: Mutation<T>) -> Result<Option<T>> {
        // The entry guard holds the shard lock until the change is written.
        let Some(mut entry) = self.records.get_mut(&id) else {
            return Ok(None);
        };
        let mut item = entry.value().clone();
        mutate(&mut item).map_err(StoreError::Rejected)?;
        *entry = item.clone();
        Ok(Some(item))
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        Ok(self.records.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.records.len() as u64)
    }
}
