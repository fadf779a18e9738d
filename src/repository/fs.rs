use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::RepositoryError;
use crate::repository::{RemoteItem, Repository};

// @module: Local-directory repository backend

/// A repository backend where each folder identifier is a local directory
/// and each item is a regular file inside it.
///
/// Item ids are the files' absolute paths, so a listing from one folder can
/// be downloaded without further lookup. Content types are inferred from
/// the file extension.
#[derive(Debug, Default)]
pub struct FsRepository;

impl FsRepository {
    /// Create a new filesystem repository
    pub fn new() -> Self {
        Self
    }

    /// Infer the content-type tag for a file name
    pub fn content_type_for(name: &str) -> &'static str {
        let extension = Path::new(name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "pdf" => "application/pdf",
            "srt" => "application/x-subrip",
            "txt" | "md" => "text/plain",
            _ => "application/octet-stream",
        }
    }

    fn folder_path(folder: &str) -> Result<PathBuf, RepositoryError> {
        let path = PathBuf::from(folder);
        if !path.is_dir() {
            return Err(RepositoryError::ListFailed(format!(
                "not a directory: {}",
                path.display()
            )));
        }
        Ok(path)
    }
}

#[async_trait]
impl Repository for FsRepository {
    async fn list(&self, folder: &str) -> Result<Vec<RemoteItem>, RepositoryError> {
        let root = Self::folder_path(folder)?;

        let mut items = Vec::new();
        for entry in WalkDir::new(&root).max_depth(1).follow_links(true) {
            let entry = entry.map_err(|e| RepositoryError::ListFailed(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            let id = entry.path().to_string_lossy().to_string();
            let content_type = Self::content_type_for(&name);
            items.push(RemoteItem::new(id, name, content_type));
        }

        // Directory iteration order is platform-dependent; sort for a
        // deterministic listing
        items.sort_by(|a, b| a.name.cmp(&b.name));

        debug!("Listed {} item(s) in {}", items.len(), root.display());

        Ok(items)
    }

    async fn download(&self, id: &str) -> Result<Bytes, RepositoryError> {
        let path = Path::new(id);
        if !path.is_file() {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        let content = tokio::fs::read(path)
            .await
            .map_err(|e| RepositoryError::DownloadFailed(format!("{}: {}", id, e)))?;

        Ok(Bytes::from(content))
    }

    async fn upload(&self, name: &str, folder: &str, content: Bytes) -> Result<String, RepositoryError> {
        let root = PathBuf::from(folder);
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| RepositoryError::UploadFailed(format!("{}: {}", folder, e)))?;

        let path = root.join(name);
        tokio::fs::write(&path, &content)
            .await
            .map_err(|e| RepositoryError::UploadFailed(format!("{}: {}", path.display(), e)))?;

        Ok(path.to_string_lossy().to_string())
    }
}
