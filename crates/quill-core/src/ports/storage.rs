//! File storage port.

use async_trait::async_trait;

use crate::domain::{FileId, FileUpload, StoredFile};
use crate::error::PlatformError;

/// File storage trait - abstraction over the platform's storage buckets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store a file under the given id.
    async fn create_file(
        &self,
        bucket_id: &str,
        file_id: &FileId,
        upload: FileUpload,
    ) -> Result<StoredFile, PlatformError>;

    async fn delete_file(&self, bucket_id: &str, file_id: &FileId) -> Result<(), PlatformError>;

    /// Direct reference to a preview of the file. Pure URL construction; existence is not checked.
    /// Fails only when the ids cannot form a URL path.
    fn file_preview(&self, bucket_id: &str, file_id: &FileId) -> Result<String, PlatformError>;
}
