//! Appwrite databases API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use quill_core::PlatformError;
use quill_core::domain::Query;
use quill_core::ports::{CollectionRef, Document, DocumentList, DocumentStore};

use crate::appwrite::{AppwriteClient, path_segment};

/// Document as serialized by the platform: `$`-prefixed metadata next to the attributes.
#[derive(Debug, Deserialize)]
struct WireDocument {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "$createdAt")]
    created_at: DateTime<Utc>,
    #[serde(rename = "$updatedAt")]
    updated_at: DateTime<Utc>,
    #[serde(flatten)]
    data: Map<String, Value>,
}

impl From<WireDocument> for Document {
    fn from(wire: WireDocument) -> Self {
        let data = wire
            .data
            .into_iter()
            .filter(|(key, _)| !key.starts_with('$'))
            .collect();

        Self {
            id: wire.id,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            data,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireDocumentList {
    total: u64,
    documents: Vec<WireDocument>,
}

/// [`DocumentStore`] backed by `/databases/{db}/collections/{col}/documents`.
#[derive(Clone)]
pub struct AppwriteDatabases {
    client: AppwriteClient,
}

impl AppwriteDatabases {
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    fn documents_path(collection: &CollectionRef) -> Result<String, PlatformError> {
        Ok(format!(
            "/databases/{}/collections/{}/documents",
            path_segment(&collection.database_id)?,
            path_segment(&collection.collection_id)?
        ))
    }

    fn document_path(
        collection: &CollectionRef,
        document_id: &str,
    ) -> Result<String, PlatformError> {
        Ok(format!(
            "{}/{}",
            Self::documents_path(collection)?,
            path_segment(document_id)?
        ))
    }
}

#[async_trait]
impl DocumentStore for AppwriteDatabases {
    async fn create_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, PlatformError> {
        let request = self
            .client
            .request(Method::POST, &Self::documents_path(collection)?)
            .json(&json!({ "documentId": document_id, "data": data }));

        let wire: WireDocument = self.client.send(request).await?;
        Ok(wire.into())
    }

    async fn update_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, PlatformError> {
        let request = self
            .client
            .request(Method::PATCH, &Self::document_path(collection, document_id)?)
            .json(&json!({ "data": data }));

        let wire: WireDocument = self.client.send(request).await?;
        Ok(wire.into())
    }

    async fn get_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
    ) -> Result<Document, PlatformError> {
        let request = self
            .client
            .request(Method::GET, &Self::document_path(collection, document_id)?);

        let wire: WireDocument = self.client.send(request).await?;
        Ok(wire.into())
    }

    async fn delete_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
    ) -> Result<(), PlatformError> {
        let request = self
            .client
            .request(Method::DELETE, &Self::document_path(collection, document_id)?);

        self.client.send_empty(request).await
    }

    async fn list_documents(
        &self,
        collection: &CollectionRef,
        queries: &[Query],
    ) -> Result<DocumentList, PlatformError> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|query| ("queries[]", query.to_string()))
            .collect();
        let request = self
            .client
            .request(Method::GET, &Self::documents_path(collection)?)
            .query(&params);

        let wire: WireDocumentList = self.client.send(request).await?;
        Ok(DocumentList {
            total: wire.total,
            documents: wire.documents.into_iter().map(Document::from).collect(),
        })
    }
}
