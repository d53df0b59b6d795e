//! Todo persistence on SQLite.
//!
//! # Responsibilities
//! - Own the connection pool
//! - Create (or recreate) the single `todos` table
//! - Insert, look up, update and delete rows
//!
//! # Design Decisions
//! - In-memory databases are pinned to one connection that never expires;
//!   every SQLite connection to `:memory:` would otherwise see its own
//!   empty database
//! - Writes use `RETURNING` so handlers get the stored row back in one
//!   round trip

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

use crate::config::DatabaseConfig;
use crate::todo::model::{NewTodo, Todo};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

const COLUMNS: &str = "id, message, label, due_date";

#[derive(Clone)]
pub struct TodoStore {
    pool: SqlitePool,
}

impl TodoStore {
    /// Open a pool for `config.url`, creating the database file if needed.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
        let in_memory = config.url.contains(":memory:") || config.url.contains("mode=memory");

        let mut pool = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_millis(config.connect_timeout_ms));
        pool = if in_memory {
            pool.max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool.max_connections(config.max_connections)
        };

        Ok(Self::from_pool(pool.connect_with(options).await?))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Round-trip a trivial query to prove the connection works.
    pub async fn authenticate(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create the table. With `force` an existing table is dropped first,
    /// wiping every row.
    pub async fn sync(&self, force: bool) -> Result<(), StoreError> {
        if force {
            sqlx::query("DROP TABLE IF EXISTS todos")
                .execute(&self.pool)
                .await?;
        }
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                message TEXT NOT NULL,
                label TEXT NOT NULL,
                due_date TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn create(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let row = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (message, label, due_date) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        ))
        .bind(todo.message)
        .bind(todo.label)
        .bind(todo.due_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_pk(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        let row = sqlx::query_as::<_, Todo>(&format!("SELECT {COLUMNS} FROM todos WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        let rows = sqlx::query_as::<_, Todo>(&format!("SELECT {COLUMNS} FROM todos ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Apply the given changes; `None` fields keep their stored value.
    /// Returns `None` when no row has this id.
    pub async fn update(&self, id: i64, message: Option<&str>) -> Result<Option<Todo>, StoreError> {
        let row = sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos SET message = COALESCE($1, message) WHERE id = $2 RETURNING {COLUMNS}"
        ))
        .bind(message)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete a row, returning it as it was.
    pub async fn destroy(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        let row = sqlx::query_as::<_, Todo>(&format!(
            "DELETE FROM todos WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> TodoStore {
        let store = TodoStore::connect(&DatabaseConfig::default()).await.unwrap();
        store.authenticate().await.unwrap();
        store.sync(true).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let store = memory_store().await;

        let created = store.create(NewTodo::new("buy milk", "home")).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.message, "buy milk");
        assert_eq!(created.label, "home");

        let found = store.find_by_pk(created.id).await.unwrap();
        assert_eq!(found.as_ref(), Some(&created));

        let updated = store.update(created.id, Some("buy oat milk")).await.unwrap().unwrap();
        assert_eq!(updated.message, "buy oat milk");
        assert_eq!(updated.due_date, created.due_date);

        let unchanged = store.update(created.id, None).await.unwrap().unwrap();
        assert_eq!(unchanged.message, "buy oat milk");

        let deleted = store.destroy(created.id).await.unwrap().unwrap();
        assert_eq!(deleted.id, created.id);
        assert!(store.find_by_pk(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_rows() {
        let store = memory_store().await;
        assert!(store.find_by_pk(99).await.unwrap().is_none());
        assert!(store.update(99, Some("x")).await.unwrap().is_none());
        assert!(store.destroy(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_forced_sync_wipes_rows() {
        let store = memory_store().await;
        store.create(NewTodo::new("a", "l")).await.unwrap();
        store.create(NewTodo::new("b", "l")).await.unwrap();
        assert_eq!(store.find_all().await.unwrap().len(), 2);

        store.sync(false).await.unwrap();
        assert_eq!(store.find_all().await.unwrap().len(), 2);

        store.sync(true).await.unwrap();
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("todos.db").display()),
            ..DatabaseConfig::default()
        };
        let store = TodoStore::connect(&config).await.unwrap();
        store.sync(true).await.unwrap();
        let created = store.create(NewTodo::new("persist", "disk")).await.unwrap();
        assert_eq!(store.find_all().await.unwrap(), vec![created]);
        assert!(dir.path().join("todos.db").exists());
    }
}
