//! Document collection port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::Query;
use crate::error::PlatformError;

/// Address of one collection inside one database.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionRef {
    pub database_id: String,
    pub collection_id: String,
}

impl CollectionRef {
    pub fn new(database_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            database_id: database_id.into(),
            collection_id: collection_id.into(),
        }
    }
}

/// A stored document: platform metadata plus user attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub data: Map<String, Value>,
}

/// Result of a listing call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentList {
    pub total: u64,
    pub documents: Vec<Document>,
}

/// Document store trait - abstraction over the platform's databases API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document under a caller-chosen key. Fails with `Conflict` if the key exists.
    async fn create_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, PlatformError>;

    /// Merge `data` into an existing document.
    async fn update_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, PlatformError>;

    async fn get_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
    ) -> Result<Document, PlatformError>;

    async fn delete_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
    ) -> Result<(), PlatformError>;

    /// List documents matching every query, in query order.
    async fn list_documents(
        &self,
        collection: &CollectionRef,
        queries: &[Query],
    ) -> Result<DocumentList, PlatformError>;
}
