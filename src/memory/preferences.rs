//! Preference store
//!
//! Each user owns one document; every write is a read-modify-write of the
//! whole document. Writes for the same user are serialized in-process.

use crate::models::{PreferenceDocument, UserContext};
use crate::state::DocumentStore;
use crate::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

pub struct PreferenceStore {
    store: Arc<dyn DocumentStore>,
    /// document key → writer lock
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Append `text` to `category` unless already present.
    ///
    /// Creates the document and category on first write. When `text` is
    /// already stored the document is left untouched and no write is issued.
    pub async fn add(&self, ctx: &UserContext, category: &str, text: &str) -> Result<()> {
        let key = ctx.document_key();
        let lock = self.writer_lock(&key).await;

        let result = {
            let _guard = lock.lock().await;
            self.append(ctx, &key, category, text).await
        };

        self.release_writer_lock(&key, lock).await;
        result
    }

    async fn append(
        &self,
        ctx: &UserContext,
        key: &str,
        category: &str,
        text: &str,
    ) -> Result<()> {
        let mut document = self.store.get(key).await?.unwrap_or_default();

        if document.add(category, text) {
            self.store.upsert(key, &document).await?;
            debug!(user = %ctx, category, "Saved preference");
        } else {
            debug!(user = %ctx, category, "Preference already stored");
        }

        Ok(())
    }

    /// Preferences stored under `category`, in insertion order.
    ///
    /// Empty when the user or category is unknown.
    pub async fn get(&self, ctx: &UserContext, category: &str) -> Result<Vec<String>> {
        let items = self.document(ctx).await?.items(category);
        debug!(user = %ctx, category, count = items.len(), "Retrieved preferences");
        Ok(items)
    }

    /// The user's whole document, empty when none exists yet
    pub async fn document(&self, ctx: &UserContext) -> Result<PreferenceDocument> {
        Ok(self
            .store
            .get(&ctx.document_key())
            .await?
            .unwrap_or_default())
    }

    async fn writer_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.lock().await;
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the map entry once no other writer for `key` holds the lock.
    async fn release_writer_lock(&self, key: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.write_locks.lock().await;
        // One reference in the map, one in `lock`
        if Arc::strong_count(&lock) == 2 {
            locks.remove(key);
        }
    }
}
