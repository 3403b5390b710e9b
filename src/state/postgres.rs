//! Postgres-backed document store
//!
//! Documents live in a single table as JSONB:
//! `(doc_key TEXT PRIMARY KEY, body JSONB NOT NULL, updated_at TIMESTAMPTZ)`.

use super::DocumentStore;
use crate::models::PreferenceDocument;
use crate::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

pub struct PostgresDocumentStore {
    pool: PgPool,
    table: String,
    schema_ready: Arc<OnceCell<()>>,
}

impl PostgresDocumentStore {
    /// Create a store over an existing pool. `table` must be a plain
    /// identifier; it is checked by [`crate::config::AppConfig`].
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
            schema_ready: Arc::new(OnceCell::new()),
        }
    }

    /// Create a store whose pool connects on first use
    pub fn connect_lazy(url: &str, table: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(url)?;
        Ok(Self::new(pool, table))
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.schema_ready
            .get_or_try_init(|| async {
                let ddl = format!(
                    r#"
                    CREATE TABLE IF NOT EXISTS {} (
                      doc_key TEXT PRIMARY KEY,
                      body JSONB NOT NULL,
                      updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                    );
                    "#,
                    self.table
                );
                sqlx::query(&ddl).execute(&self.pool).await?;
                debug!(table = %self.table, "Preference schema ready");
                Ok::<(), sqlx::Error>(())
            })
            .await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn get(&self, key: &str) -> Result<Option<PreferenceDocument>> {
        self.ensure_schema().await?;

        let sql = format!("SELECT body FROM {} WHERE doc_key = $1", self.table);
        let body: Option<serde_json::Value> = sqlx::query_scalar(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match body {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn upsert(&self, key: &str, document: &PreferenceDocument) -> Result<()> {
        self.ensure_schema().await?;

        let sql = format!(
            r#"
            INSERT INTO {} (doc_key, body, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (doc_key) DO UPDATE
              SET body = EXCLUDED.body, updated_at = NOW()
            "#,
            self.table
        );

        sqlx::query(&sql)
            .bind(key)
            .bind(serde_json::to_value(document)?)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
