//! Appwrite storage API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use quill_core::PlatformError;
use quill_core::domain::{FileId, FileUpload, StoredFile};
use quill_core::ports::FileStorage;

use crate::appwrite::{AppwriteClient, path_segment};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFile {
    #[serde(rename = "$id")]
    id: String,
    bucket_id: String,
    #[serde(rename = "$createdAt")]
    created_at: DateTime<Utc>,
    name: String,
    mime_type: String,
    size_original: u64,
}

impl From<WireFile> for StoredFile {
    fn from(wire: WireFile) -> Self {
        Self {
            id: FileId::new(wire.id),
            bucket_id: wire.bucket_id,
            name: wire.name,
            mime_type: wire.mime_type,
            size: wire.size_original,
            created_at: wire.created_at,
        }
    }
}

/// [`FileStorage`] backed by `/storage/buckets/{bucket}/files`.
#[derive(Clone)]
pub struct AppwriteStorage {
    client: AppwriteClient,
}

impl AppwriteStorage {
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    fn files_path(bucket_id: &str) -> Result<String, PlatformError> {
        Ok(format!("/storage/buckets/{}/files", path_segment(bucket_id)?))
    }

    fn file_path(bucket_id: &str, file_id: &FileId) -> Result<String, PlatformError> {
        Ok(format!(
            "{}/{}",
            Self::files_path(bucket_id)?,
            path_segment(file_id.as_str())?
        ))
    }
}

#[async_trait]
impl FileStorage for AppwriteStorage {
    async fn create_file(
        &self,
        bucket_id: &str,
        file_id: &FileId,
        upload: FileUpload,
    ) -> Result<StoredFile, PlatformError> {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.name)
            .mime_str(&upload.mime_type)
            .map_err(|e| PlatformError::Invalid(e.to_string()))?;
        let form = Form::new()
            .text("fileId", file_id.to_string())
            .part("file", part);

        let request = self
            .client
            .request(Method::POST, &Self::files_path(bucket_id)?)
            .multipart(form);

        let wire: WireFile = self.client.send(request).await?;
        Ok(wire.into())
    }

    async fn delete_file(&self, bucket_id: &str, file_id: &FileId) -> Result<(), PlatformError> {
        let request = self
            .client
            .request(Method::DELETE, &Self::file_path(bucket_id, file_id)?);

        self.client.send_empty(request).await
    }

    fn file_preview(&self, bucket_id: &str, file_id: &FileId) -> Result<String, PlatformError> {
        Ok(format!(
            "{}/preview?project={}",
            self.client.url(&Self::file_path(bucket_id, file_id)?),
            urlencoding::encode(&self.client.config().project_id)
        ))
    }
}
