//! Document persistence layer
//!
//! One JSON document per user, addressed by key. The store only knows how to
//! fetch and replace whole documents; merging happens in
//! [`crate::memory::PreferenceStore`].

pub mod postgres;

use crate::config::AppConfig;
use crate::error::MemoryError;
use crate::models::PreferenceDocument;
use crate::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

pub use postgres::PostgresDocumentStore;

/// Trait for document persistence
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document. `Ok(None)` means not found; `Err` is a storage fault.
    async fn get(&self, key: &str) -> Result<Option<PreferenceDocument>>;

    /// Replace the full document stored under `key`.
    async fn upsert(&self, key: &str, document: &PreferenceDocument) -> Result<()>;

    /// Backend name for logs and health output
    fn backend_name(&self) -> &'static str;
}

/// In-memory document store for development and tests
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<HashMap<String, PreferenceDocument>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, key: &str) -> Result<Option<PreferenceDocument>> {
        let documents = self.documents.read().await;
        Ok(documents.get(key).cloned())
    }

    async fn upsert(&self, key: &str, document: &PreferenceDocument) -> Result<()> {
        let mut documents = self.documents.write().await;
        documents.insert(key.to_string(), document.clone());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}

/// Build the document store selected by `config`.
///
/// The in-memory store is used only when no database URL is configured. A
/// configured URL that cannot be turned into a pool is an error.
pub fn build_store(config: &AppConfig) -> Result<Arc<dyn DocumentStore>> {
    let Some(url) = config.database_url.as_deref() else {
        info!("Preference store backend: in-memory");
        return Ok(Arc::new(InMemoryDocumentStore::new()));
    };

    let store =
        PostgresDocumentStore::connect_lazy(url, &config.table_name, config.max_connections)
            .map_err(|e| MemoryError::Config(format!("invalid database URL: {}", e)))?;

    info!(table = %config.table_name, "Preference store backend: postgres");
    Ok(Arc::new(store))
}
