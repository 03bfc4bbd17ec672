//! PostgreSQL storage backend implementation.
//!
//! Uses sqlx for database operations and implements the ItemStore trait.

use super::{StorageError, traits::ItemStore};
use crate::models::{BaseItem, Item};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

/// PostgreSQL storage backend implementation.
pub struct PostgresItemStore {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: String,
    name: String,
    price: i64,
    description: String,
    image: String,
}

#[derive(sqlx::FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    item: ItemRow,
    created: bool,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item::new(
            row.id,
            BaseItem::new(row.name, row.price, row.description, row.image),
        )
    }
}

fn map_sqlx_error(e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StorageError::ConnectionError(e.to_string())
        }
        other => StorageError::Other(other.to_string()),
    }
}

impl PostgresItemStore {
    /// Create a new PostgreSQL storage backend.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database and run the embedded migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPool::connect(database_url).await.map_err(|e| {
            StorageError::ConnectionError(format!("Failed to connect to database: {}", e))
        })?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StorageError::ConnectionError(format!("Migration failed: {}", e)))?;

        info!("PostgreSQL item store ready");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ItemStore for PostgresItemStore {
    async fn find_all(&self) -> Result<Vec<Item>, StorageError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, price, description, image
            FROM items
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn find(&self, id: &str) -> Result<Option<Item>, StorageError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, price, description, image
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Item::from))
    }

    async fn create(&self, item: BaseItem, id: Option<String>) -> Result<Item, StorageError> {
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());

        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            INSERT INTO items (id, name, price, description, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, price, description, image
            "#,
        )
        .bind(&id)
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.description)
        .bind(&item.image)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update(&self, id: &str, item: BaseItem) -> Result<Item, StorageError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            UPDATE items
            SET name = $2, price = $3, description = $4, image = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, price, description, image
            "#,
        )
        .bind(id)
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.description)
        .bind(&item.image)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(Item::from)
            .ok_or_else(|| StorageError::item_not_found(id))
    }

    async fn upsert(&self, id: &str, item: BaseItem) -> Result<(Item, bool), StorageError> {
        // xmax is 0 only for a freshly inserted row version
        let row = sqlx::query_as::<_, UpsertRow>(
            r#"
            INSERT INTO items (id, name, price, description, image)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                price = EXCLUDED.price,
                description = EXCLUDED.description,
                image = EXCLUDED.image,
                updated_at = NOW()
            RETURNING id, name, price, description, image, (xmax = 0) AS created
            "#,
        )
        .bind(id)
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.description)
        .bind(&item.image)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok((row.item.into(), row.created))
    }

    async fn remove(&self, id: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
