use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::check_custom_id;
use crate::error::DomainError;

/// Identifier of a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Validate an id that arrives from outside, such as a request path.
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        check_custom_id("file id", &value)?;
        Ok(Self(value))
    }

    /// Fresh identifier for a new upload: 32 lowercase hex characters,
    /// which satisfies the platform's custom id rules.
    pub fn unique() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// File metadata as kept by the storage bucket. The payload itself is opaque here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: FileId,
    pub bucket_id: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

/// A file to upload.
#[derive(Clone, PartialEq)]
pub struct FileUpload {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_ids_differ_and_fit_platform_rules() {
        let a = FileId::unique();
        let b = FileId::unique();

        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_parse_rejects_path_segments() {
        assert!(FileId::parse("6650f1c2a9d0b3e4").is_ok());
        assert!(FileId::parse(FileId::unique().as_str()).is_ok());

        assert!(matches!(FileId::parse(".."), Err(DomainError::Validation(_))));
        assert!(FileId::parse("../../buckets").is_err());
        assert!(FileId::parse("a/b").is_err());
        assert!(FileId::parse("").is_err());
    }

    #[test]
    fn test_upload_debug_hides_payload() {
        let upload = FileUpload::new("cover.png", "image/png", vec![1, 2, 3]);
        let rendered = format!("{upload:?}");

        assert!(rendered.contains("size: 3"));
        assert!(!rendered.contains("bytes"));
    }
}
