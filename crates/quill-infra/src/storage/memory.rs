//! In-memory file storage - used as fallback when the platform is not configured.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quill_core::PlatformError;
use quill_core::domain::{FileId, FileUpload, StoredFile};
use quill_core::ports::FileStorage;

use crate::custom_id;

/// Base of the preview references handed out by [`InMemoryFileStorage`].
pub const MEMORY_ENDPOINT: &str = "memory://quill";

const NOT_FOUND: &str = "The requested file could not be found.";
const ALREADY_EXISTS: &str = "A storage file with the requested ID already exists.";

struct StoredEntry {
    file: StoredFile,
    bytes: Vec<u8>,
}

/// In-memory buckets. Note: Data is lost on process restart.
pub struct InMemoryFileStorage {
    files: RwLock<HashMap<(String, FileId), StoredEntry>>,
}

impl InMemoryFileStorage {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
        }
    }

    /// Metadata of a stored file, as returned when it was created.
    pub async fn metadata(&self, bucket_id: &str, file_id: &FileId) -> Option<StoredFile> {
        let files = self.files.read().await;
        files
            .get(&(bucket_id.to_string(), file_id.clone()))
            .map(|entry| entry.file.clone())
    }

    /// Payload of a stored file.
    pub async fn contents(&self, bucket_id: &str, file_id: &FileId) -> Option<Vec<u8>> {
        let files = self.files.read().await;
        files
            .get(&(bucket_id.to_string(), file_id.clone()))
            .map(|entry| entry.bytes.clone())
    }
}

impl Default for InMemoryFileStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStorage for InMemoryFileStorage {
    async fn create_file(
        &self,
        bucket_id: &str,
        file_id: &FileId,
        upload: FileUpload,
    ) -> Result<StoredFile, PlatformError> {
        custom_id::check("fileId", file_id.as_str())?;

        let key = (bucket_id.to_string(), file_id.clone());
        let mut files = self.files.write().await;
        if files.contains_key(&key) {
            return Err(PlatformError::Conflict(ALREADY_EXISTS.to_string()));
        }

        let file = StoredFile {
            id: file_id.clone(),
            bucket_id: bucket_id.to_string(),
            size: upload.size(),
            name: upload.name,
            mime_type: upload.mime_type,
            created_at: Utc::now(),
        };
        files.insert(
            key,
            StoredEntry {
                file: file.clone(),
                bytes: upload.bytes,
            },
        );
        Ok(file)
    }

    async fn delete_file(&self, bucket_id: &str, file_id: &FileId) -> Result<(), PlatformError> {
        let mut files = self.files.write().await;
        files
            .remove(&(bucket_id.to_string(), file_id.clone()))
            .map(|_| ())
            .ok_or_else(|| PlatformError::NotFound(NOT_FOUND.to_string()))
    }

    fn file_preview(&self, bucket_id: &str, file_id: &FileId) -> Result<String, PlatformError> {
        custom_id::check("fileId", file_id.as_str())?;
        Ok(format!(
            "{MEMORY_ENDPOINT}/storage/buckets/{bucket_id}/files/{file_id}/preview"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload() -> FileUpload {
        FileUpload::new("cover.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let storage = InMemoryFileStorage::new();
        let id = FileId::from("cover");

        let file = storage.create_file("images", &id, upload()).await.unwrap();

        assert_eq!(file.size, 4);
        assert_eq!(file.bucket_id, "images");
        assert_eq!(
            storage.contents("images", &id).await,
            Some(vec![0x89, 0x50, 0x4e, 0x47])
        );
        assert_eq!(storage.metadata("images", &id).await, Some(file));
        assert_eq!(storage.metadata("avatars", &id).await, None);
    }

    #[tokio::test]
    async fn test_duplicate_conflicts_and_missing_not_found() {
        let storage = InMemoryFileStorage::new();
        let id = FileId::from("cover");
        storage.create_file("images", &id, upload()).await.unwrap();

        assert!(matches!(
            storage.create_file("images", &id, upload()).await,
            Err(PlatformError::Conflict(_))
        ));

        storage.delete_file("images", &id).await.unwrap();
        assert!(matches!(
            storage.delete_file("images", &id).await,
            Err(PlatformError::NotFound(_))
        ));
    }

    #[test]
    fn test_preview_is_pure() {
        let storage = InMemoryFileStorage::new();
        assert_eq!(
            storage
                .file_preview("images", &FileId::from("missing"))
                .unwrap(),
            "memory://quill/storage/buckets/images/files/missing/preview"
        );
        assert!(matches!(
            storage.file_preview("images", &FileId::from("..")),
            Err(PlatformError::Invalid(_))
        ));
    }
}
