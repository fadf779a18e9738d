/*!
 * Document repository backends.
 *
 * The pipeline reads from and writes to folder-like containers of named
 * blobs. The [`Repository`] trait is the only surface the pipeline sees;
 * any blob store exposing list/download/upload under a folder identifier
 * can be plugged in. Two backends ship with the crate:
 * - `fs`: a local directory per folder identifier
 * - `memory`: an in-memory store for tests
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

use crate::errors::RepositoryError;

/// One entry of a folder listing.
///
/// Items are produced by [`Repository::list`] and are read-only to the
/// pipeline: nothing downstream ever mutates an item, it only decides
/// whether to process it.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteItem {
    /// Opaque backend-specific identifier, valid for download
    pub id: String,
    /// Display name of the item, carrying the extension
    pub name: String,
    /// Declared content-type tag (MIME-like)
    pub content_type: String,
}

impl RemoteItem {
    /// Create a new item descriptor
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content_type: content_type.into(),
        }
    }
}

/// A folder-like store of named blobs.
///
/// Listing order is whatever the backend returns for this call; the
/// pipeline processes items in that order but must not depend on it being
/// stable between calls.
#[async_trait]
pub trait Repository: Send + Sync + Debug {
    /// List the items currently present in a folder
    async fn list(&self, folder: &str) -> Result<Vec<RemoteItem>, RepositoryError>;

    /// Download the raw bytes of an item by id
    async fn download(&self, id: &str) -> Result<Bytes, RepositoryError>;

    /// Upload a named blob into a folder, returning the new item's id
    async fn upload(&self, name: &str, folder: &str, content: Bytes) -> Result<String, RepositoryError>;
}

pub mod fs;
pub mod memory;

pub use fs::FsRepository;
pub use memory::MemoryRepository;
