/*!
 * In-memory repository backend for tests.
 *
 * Folders and items live in a mutex-guarded map shared between clones, so a
 * test can hold one handle while the pipeline works through another and
 * observe uploads as they happen.
 */

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::RepositoryError;
use crate::repository::{RemoteItem, Repository};

/// One stored blob
#[derive(Debug, Clone)]
struct StoredItem {
    id: String,
    name: String,
    content_type: String,
    content: Bytes,
}

/// In-memory folder store
#[derive(Debug, Default)]
struct Store {
    /// Folder identifier -> items in insertion order
    folders: HashMap<String, Vec<StoredItem>>,
}

/// In-memory repository backend
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    store: Arc<Mutex<Store>>,
}

impl MemoryRepository {
    /// Create a new, empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an item into a folder, returning its generated id
    pub fn seed(&self, folder: &str, name: &str, content_type: &str, content: impl Into<Bytes>) -> String {
        let id = Uuid::new_v4().to_string();
        let mut store = self.store.lock();
        store.folders.entry(folder.to_string()).or_default().push(StoredItem {
            id: id.clone(),
            name: name.to_string(),
            content_type: content_type.to_string(),
            content: content.into(),
        });
        id
    }

    /// Names currently present in a folder, in insertion order
    pub fn names_in(&self, folder: &str) -> Vec<String> {
        let store = self.store.lock();
        store
            .folders
            .get(folder)
            .map(|items| items.iter().map(|item| item.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Content of a named item in a folder, if present
    pub fn content_of(&self, folder: &str, name: &str) -> Option<Bytes> {
        let store = self.store.lock();
        store
            .folders
            .get(folder)?
            .iter()
            .find(|item| item.name == name)
            .map(|item| item.content.clone())
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn list(&self, folder: &str) -> Result<Vec<RemoteItem>, RepositoryError> {
        let store = self.store.lock();
        Ok(store
            .folders
            .get(folder)
            .map(|items| {
                items
                    .iter()
                    .map(|item| RemoteItem::new(&item.id, &item.name, &item.content_type))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn download(&self, id: &str) -> Result<Bytes, RepositoryError> {
        let store = self.store.lock();
        store
            .folders
            .values()
            .flatten()
            .find(|item| item.id == id)
            .map(|item| item.content.clone())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn upload(&self, name: &str, folder: &str, content: Bytes) -> Result<String, RepositoryError> {
        let id = Uuid::new_v4().to_string();
        let content_type = crate::repository::fs::FsRepository::content_type_for(name).to_string();
        let mut store = self.store.lock();
        store.folders.entry(folder.to_string()).or_default().push(StoredItem {
            id: id.clone(),
            name: name.to_string(),
            content_type,
            content,
        });
        Ok(id)
    }
}
