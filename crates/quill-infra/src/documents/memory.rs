//! In-memory document store - used as fallback when the platform is not configured.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use quill_core::PlatformError;
use quill_core::domain::Query;
use quill_core::ports::{CollectionRef, Document, DocumentList, DocumentStore};

use crate::custom_id;

/// Page size applied when a listing carries no `limit` query.
pub const DEFAULT_LIMIT: usize = 25;

const NOT_FOUND: &str = "Document with the requested ID could not be found.";
const ALREADY_EXISTS: &str = "Document with the requested ID already exists. \
     Try again with a different ID or use ID.unique() to generate a unique ID.";

/// In-memory document store keyed by collection.
///
/// Documents keep their insertion order, which is the natural listing order.
/// Note: Data is lost on process restart.
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<CollectionRef, Vec<Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, PlatformError> {
        custom_id::check("documentId", document_id)?;

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.clone()).or_default();
        if documents.iter().any(|d| d.id == document_id) {
            return Err(PlatformError::Conflict(ALREADY_EXISTS.to_string()));
        }

        let now = Utc::now();
        let document = Document {
            id: document_id.to_string(),
            created_at: now,
            updated_at: now,
            data,
        };
        documents.push(document.clone());
        Ok(document)
    }

    async fn update_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document, PlatformError> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|d| d.id == document_id))
            .ok_or_else(|| PlatformError::NotFound(NOT_FOUND.to_string()))?;

        document.data.extend(data);
        document.updated_at = Utc::now();
        Ok(document.clone())
    }

    async fn get_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
    ) -> Result<Document, PlatformError> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|d| d.id == document_id))
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(NOT_FOUND.to_string()))
    }

    async fn delete_document(
        &self,
        collection: &CollectionRef,
        document_id: &str,
    ) -> Result<(), PlatformError> {
        let mut collections = self.collections.write().await;
        let documents = collections
            .get_mut(collection)
            .ok_or_else(|| PlatformError::NotFound(NOT_FOUND.to_string()))?;

        let before = documents.len();
        documents.retain(|d| d.id != document_id);
        if documents.len() == before {
            return Err(PlatformError::NotFound(NOT_FOUND.to_string()));
        }
        Ok(())
    }

    async fn list_documents(
        &self,
        collection: &CollectionRef,
        queries: &[Query],
    ) -> Result<DocumentList, PlatformError> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(DocumentList::default());
        };

        let mut matched: Vec<&Document> = documents
            .iter()
            .filter(|document| queries.iter().all(|query| matches(document, query)))
            .collect();

        let orders: Vec<(&str, bool)> = queries
            .iter()
            .filter_map(|query| match query {
                Query::OrderAsc(attribute) => Some((attribute.as_str(), true)),
                Query::OrderDesc(attribute) => Some((attribute.as_str(), false)),
                _ => None,
            })
            .collect();
        if !orders.is_empty() {
            matched.sort_by(|a, b| {
                orders
                    .iter()
                    .map(|(attribute, ascending)| {
                        let ordering = compare(
                            attribute_value(a, attribute).as_ref(),
                            attribute_value(b, attribute).as_ref(),
                        );
                        if *ascending { ordering } else { ordering.reverse() }
                    })
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
        }

        let limit = window(queries, |q| match q {
            Query::Limit(n) => Some(*n),
            _ => None,
        })
        .unwrap_or(DEFAULT_LIMIT);
        let offset = window(queries, |q| match q {
            Query::Offset(n) => Some(*n),
            _ => None,
        })
        .unwrap_or(0);

        Ok(DocumentList {
            total: matched.len() as u64,
            documents: matched
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
        })
    }
}

/// Last occurrence wins, as on the platform.
fn window(queries: &[Query], pick: impl Fn(&Query) -> Option<u32>) -> Option<usize> {
    queries.iter().rev().find_map(pick).map(|n| n as usize)
}

/// Metadata attributes are addressable with their `$` names.
fn attribute_value(document: &Document, attribute: &str) -> Option<Value> {
    match attribute {
        "$id" => Some(Value::String(document.id.clone())),
        "$createdAt" => Some(Value::String(
            document
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, false),
        )),
        "$updatedAt" => Some(Value::String(
            document
                .updated_at
                .to_rfc3339_opts(SecondsFormat::Millis, false),
        )),
        _ => document.data.get(attribute).cloned(),
    }
}

fn matches(document: &Document, query: &Query) -> bool {
    match query {
        Query::Equal { attribute, values } => attribute_value(document, attribute)
            .is_some_and(|value| values.contains(&value)),
        Query::NotEqual { attribute, values } => attribute_value(document, attribute)
            .is_none_or(|value| !values.contains(&value)),
        Query::Search { attribute, term } => {
            let Some(Value::String(text)) = attribute_value(document, attribute) else {
                return false;
            };
            let text = text.to_lowercase();
            term.split_whitespace()
                .all(|word| text.contains(&word.to_lowercase()))
        }
        Query::OrderAsc(_) | Query::OrderDesc(_) | Query::Limit(_) | Query::Offset(_) => true,
    }
}

/// Missing values sort first.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn collection() -> CollectionRef {
        CollectionRef::new("blog", "articles")
    }

    fn data(title: &str, status: &str) -> Map<String, Value> {
        let Value::Object(map) = json!({ "title": title, "status": status }) else {
            unreachable!()
        };
        map
    }

    async fn seeded() -> InMemoryDocumentStore {
        let store = InMemoryDocumentStore::new();
        for (id, title, status) in [
            ("first", "Rust ownership", "active"),
            ("second", "Appwrite queries", "inactive"),
            ("third", "Async Rust", "active"),
        ] {
            store
                .create_document(&collection(), id, data(title, status))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryDocumentStore::new();
        store
            .create_document(&collection(), "hello-world", data("Hello", "active"))
            .await
            .unwrap();

        let document = store
            .get_document(&collection(), "hello-world")
            .await
            .unwrap();
        assert_eq!(document.data["title"], "Hello");
    }

    #[tokio::test]
    async fn test_duplicate_id_conflicts() {
        let store = seeded().await;
        let err = store
            .create_document(&collection(), "first", data("Again", "active"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_invalid_id_rejected() {
        let store = InMemoryDocumentStore::new();
        let err = store
            .create_document(&collection(), "-leading-dash", data("x", "active"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_missing_document_not_found() {
        let store = seeded().await;

        assert!(matches!(
            store.get_document(&collection(), "nope").await,
            Err(PlatformError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_document(&collection(), "nope").await,
            Err(PlatformError::NotFound(_))
        ));
        assert!(matches!(
            store
                .update_document(&collection(), "nope", Map::new())
                .await,
            Err(PlatformError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_merges_attributes() {
        let store = seeded().await;
        let mut patch = Map::new();
        patch.insert("status".into(), json!("inactive"));

        let document = store
            .update_document(&collection(), "first", patch)
            .await
            .unwrap();

        assert_eq!(document.data["title"], "Rust ownership");
        assert_eq!(document.data["status"], "inactive");
    }

    #[tokio::test]
    async fn test_equal_and_not_equal_filters() {
        let store = seeded().await;

        let active = store
            .list_documents(&collection(), &[Query::equal("status", "active")])
            .await
            .unwrap();
        assert_eq!(active.total, 2);

        let inactive = store
            .list_documents(&collection(), &[Query::not_equal("status", "active")])
            .await
            .unwrap();
        assert_eq!(inactive.documents[0].id, "second");
    }

    #[tokio::test]
    async fn test_search_order_and_window() {
        let store = seeded().await;

        let rust = store
            .list_documents(&collection(), &[Query::search("title", "rust")])
            .await
            .unwrap();
        assert_eq!(rust.total, 2);

        let page = store
            .list_documents(
                &collection(),
                &[Query::order_desc("title"), Query::limit(1), Query::offset(1)],
            )
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.documents.len(), 1);
        assert_eq!(page.documents[0].id, "third");
    }

    #[tokio::test]
    async fn test_default_limit_applies() {
        let store = InMemoryDocumentStore::new();
        for n in 0..30 {
            store
                .create_document(&collection(), &format!("post-{n}"), data("t", "active"))
                .await
                .unwrap();
        }

        let list = store.list_documents(&collection(), &[]).await.unwrap();
        assert_eq!(list.total, 30);
        assert_eq!(list.documents.len(), DEFAULT_LIMIT);
        assert_eq!(list.documents[0].id, "post-0");
    }
}
