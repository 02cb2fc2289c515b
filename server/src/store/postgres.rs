//! PostgreSQL repository.
//!
//! All collections share one `resources` table keyed by `(collection, id)`;
//! each row holds a record's JSON body.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::marker::PhantomData;

use super::{Mutation, Repository, Result, StoreError};
use crate::models::Entity;

/// Type alias for the database pool.
pub type Pool = PgPool;

/// Create a new database connection pool.
pub async fn create_pool(database_url: &str) -> std::result::Result<Pool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Run database migrations.
pub async fn run_migrations(pool: &Pool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Repository for one collection stored in the `resources` table.
#[derive(Debug)]
pub struct PgRepository<T> {
    pool: Pool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> PgRepository<T> {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    fn decode(row: &sqlx::postgres::PgRow) -> Result<T> {
        let id: i64 = row.try_get("id")?;
        let body: serde_json::Value = row.try_get("body")?;
        let mut item: T = serde_json::from_value(body).map_err(|source| StoreError::Corrupt {
            collection: T::COLLECTION,
            id,
            source,
        })?;
        item.set_id(id as u64);
        Ok(item)
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for PgRepository<T> {
    async fn all(&self) -> Result<Vec<T>> {
        let rows = sqlx::query(
            r#"
            SELECT id, body
            FROM resources
            WHERE collection = $1
            ORDER BY id ASC
            "#,
        )
        .bind(T::COLLECTION)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::decode).collect()
    }

    async fn get(&self, id: u64) -> Result<Option<T>> {
        let row = sqlx::query(
            r#"
            SELECT id, body
            FROM resources
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(T::COLLECTION)
        .bind(id as i64)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::decode).transpose()
    }

    async fn create(&self, mut item: T) -> Result<T> {
        let mut tx = self.pool.begin().await?;

        // Serializes id allocation within the collection.
        sqlx::query(r#"SELECT pg_advisory_xact_lock(hashtext($1))"#)
            .bind(T::COLLECTION)
            .execute(&mut *tx)
            .await?;

        let (id,): (i64,) = sqlx::query_as(
            r#"SELECT COALESCE(MAX(id), 0) + 1 FROM resources WHERE collection = $1"#,
        )
        .bind(T::COLLECTION)
        .fetch_one(&mut *tx)
        .await?;

        item.set_id(id as u64);

        sqlx::query(
            r#"
            INSERT INTO resources (collection, id, body)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(T::COLLECTION)
        .bind(id)
        .bind(serde_json::to_value(&item)?)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(collection = T::COLLECTION, id, "record created");
        Ok(item)
    }

    async fn update(&self, item: T) -> Result<Option<T>> {
        let result = sqlx::query(
            r#"
            UPDATE resources
            SET body = $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(T::COLLECTION)
        .bind(item.id() as i64)
        .bind(serde_json::to_value(&item)?)
        .execute(&self.pool)
        .await?;

        Ok((result.rows_affected() > 0).then_some(item))
    }

    async fn modify(&self, id: u64, mutate: Mutation<T>) -> Result<Option<T>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT id, body
            FROM resources
            WHERE collection = $1 AND id = $2
            FOR UPDATE
            "#,
        )
        .bind(T::COLLECTION)
        .bind(id as i64)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut item = Self::decode(&row)?;

        // Dropping the transaction on rejection releases the row lock.
        mutate(&mut item).map_err(StoreError::Rejected)?;

        sqlx::query(
            r#"
            UPDATE resources
            SET body = $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(T::COLLECTION)
        .bind(id as i64)
        .bind(serde_json::to_value(&item)?)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(item))
    }

    async fn delete(&self, id: u64) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM resources WHERE collection = $1 AND id = $2"#)
            .bind(T::COLLECTION)
            .bind(id as i64)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64> {
        let (count,): (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM resources WHERE collection = $1"#)
                .bind(T::COLLECTION)
                .fetch_one(&self.pool)
                .await?;

        Ok(count as u64)
    }
}
