//! Blog façade - post CRUD and featured-image storage over the platform ports.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::{
    FileId, FileUpload, NewPost, Post, PostList, PostPatch, PostStatus, Query, Slug, StoredFile,
};
use crate::error::{DomainError, PlatformError};
use crate::ports::{CollectionRef, Document, DocumentStore, FileStorage};

const POST: &str = "post";
const FILE: &str = "file";

mod attr {
    pub const TITLE: &str = "title";
    pub const CONTENT: &str = "content";
    pub const FEATURED_IMAGE: &str = "featuredImage";
    pub const STATUS: &str = "status";
    pub const USER_ID: &str = "userId";
}

/// The collection and bucket this service works against.
#[derive(Debug, Clone)]
pub struct BlogTarget {
    pub collection: CollectionRef,
    pub bucket_id: String,
}

impl BlogTarget {
    pub fn new(
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
        bucket_id: impl Into<String>,
    ) -> Self {
        Self {
            collection: CollectionRef::new(database_id, collection_id),
            bucket_id: bucket_id.into(),
        }
    }
}

/// Single point of access to the posts collection and the images bucket.
///
/// Every async operation makes exactly one platform call. Failures are logged
/// with the operation name and returned as a [`DomainError`].
#[derive(Clone)]
pub struct BlogService {
    documents: Arc<dyn DocumentStore>,
    files: Arc<dyn FileStorage>,
    target: BlogTarget,
}

impl BlogService {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        files: Arc<dyn FileStorage>,
        target: BlogTarget,
    ) -> Self {
        Self {
            documents,
            files,
            target,
        }
    }

    pub fn target(&self) -> &BlogTarget {
        &self.target
    }

    /// Create a post under its slug. An existing slug is a `Conflict`.
    pub async fn create_post(&self, post: NewPost) -> Result<Post, DomainError> {
        post.validate()?;

        let slug = post.slug.clone();
        let mut data = Map::new();
        data.insert(attr::TITLE.into(), Value::String(post.title));
        data.insert(attr::CONTENT.into(), Value::String(post.content));
        if let Some(image) = post.featured_image {
            data.insert(attr::FEATURED_IMAGE.into(), Value::String(image.to_string()));
        }
        data.insert(attr::STATUS.into(), Value::String(post.status.to_string()));
        data.insert(attr::USER_ID.into(), Value::String(post.user_id));

        let document = self
            .documents
            .create_document(&self.target.collection, slug.as_str(), data)
            .await
            .map_err(|e| failed("create_post", POST, slug.as_str(), e))?;

        tracing::debug!(slug = %slug, "Post created");
        post_from_document(document)
    }

    /// Apply a partial update. Owner and slug are never sent.
    pub async fn update_post(&self, slug: &Slug, patch: PostPatch) -> Result<Post, DomainError> {
        patch.validate()?;

        let mut data = Map::new();
        if let Some(title) = patch.title {
            data.insert(attr::TITLE.into(), Value::String(title));
        }
        if let Some(content) = patch.content {
            data.insert(attr::CONTENT.into(), Value::String(content));
        }
        if let Some(image) = patch.featured_image {
            data.insert(attr::FEATURED_IMAGE.into(), Value::String(image.to_string()));
        }
        if let Some(status) = patch.status {
            data.insert(attr::STATUS.into(), Value::String(status.to_string()));
        }

        let document = self
            .documents
            .update_document(&self.target.collection, slug.as_str(), data)
            .await
            .map_err(|e| failed("update_post", POST, slug.as_str(), e))?;

        tracing::debug!(slug = %slug, "Post updated");
        post_from_document(document)
    }

    /// Delete a post. Deleting a missing slug is `NotFound`.
    pub async fn delete_post(&self, slug: &Slug) -> Result<(), DomainError> {
        self.documents
            .delete_document(&self.target.collection, slug.as_str())
            .await
            .map_err(|e| failed("delete_post", POST, slug.as_str(), e))?;

        tracing::debug!(slug = %slug, "Post deleted");
        Ok(())
    }

    /// Fetch a post. A missing slug is `Ok(None)`; only real failures are errors.
    pub async fn get_post(&self, slug: &Slug) -> Result<Option<Post>, DomainError> {
        match self
            .documents
            .get_document(&self.target.collection, slug.as_str())
            .await
        {
            Ok(document) => post_from_document(document).map(Some),
            Err(PlatformError::NotFound(_)) => {
                tracing::debug!(operation = "get_post", slug = %slug, "Post not found");
                Ok(None)
            }
            Err(e) => Err(failed("get_post", POST, slug.as_str(), e)),
        }
    }

    /// List posts. `None` means the default filter, `status = active`.
    pub async fn get_posts(&self, queries: Option<Vec<Query>>) -> Result<PostList, DomainError> {
        let queries = queries.unwrap_or_else(Query::active_posts);

        let list = self
            .documents
            .list_documents(&self.target.collection, &queries)
            .await
            .map_err(|e| failed("get_posts", POST, &self.target.collection.collection_id, e))?;

        let posts = list
            .documents
            .into_iter()
            .filter_map(|document| {
                let id = document.id.clone();
                post_from_document(document)
                    .inspect_err(|e| {
                        tracing::warn!(
                            operation = "get_posts",
                            key = %id,
                            error = %e,
                            "Skipping unreadable post"
                        );
                    })
                    .ok()
            })
            .collect();

        Ok(PostList {
            total: list.total,
            posts,
        })
    }

    /// Store a file under a freshly generated id.
    pub async fn upload_file(&self, upload: FileUpload) -> Result<StoredFile, DomainError> {
        if upload.name.trim().is_empty() {
            return Err(DomainError::Validation("file name is required".to_string()));
        }
        if upload.bytes.is_empty() {
            return Err(DomainError::Validation("file is empty".to_string()));
        }

        let file_id = FileId::unique();
        let stored = self
            .files
            .create_file(&self.target.bucket_id, &file_id, upload)
            .await
            .map_err(|e| failed("upload_file", FILE, file_id.as_str(), e))?;

        tracing::debug!(file_id = %stored.id, size = stored.size, "File uploaded");
        Ok(stored)
    }

    pub async fn delete_file(&self, file_id: &FileId) -> Result<(), DomainError> {
        self.files
            .delete_file(&self.target.bucket_id, file_id)
            .await
            .map_err(|e| failed("delete_file", FILE, file_id.as_str(), e))?;

        tracing::debug!(file_id = %file_id, "File deleted");
        Ok(())
    }

    /// Preview URL of a stored file. Not checked against the bucket.
    pub fn file_preview(&self, file_id: &FileId) -> Result<String, DomainError> {
        self.files
            .file_preview(&self.target.bucket_id, file_id)
            .map_err(|e| failed("file_preview", FILE, file_id.as_str(), e))
    }
}

fn failed(
    operation: &'static str,
    entity: &'static str,
    key: &str,
    err: PlatformError,
) -> DomainError {
    match &err {
        PlatformError::NotFound(_) => {
            tracing::debug!(operation, key, error = %err, "Platform reported not found");
        }
        _ => {
            tracing::error!(operation, key, error = %err, "Platform call failed");
        }
    }
    DomainError::from_platform(err, entity, key)
}

fn post_from_document(document: Document) -> Result<Post, DomainError> {
    let Document {
        id,
        created_at,
        updated_at,
        mut data,
    } = document;

    let mut take_string = |name: &str| -> Result<String, DomainError> {
        match data.remove(name) {
            Some(Value::String(s)) => Ok(s),
            other => Err(DomainError::Internal(format!(
                "document '{id}' has no string attribute '{name}' (found {other:?})"
            ))),
        }
    };

    let title = take_string(attr::TITLE)?;
    let content = take_string(attr::CONTENT)?;
    let status: PostStatus = take_string(attr::STATUS)?
        .parse()
        .map_err(|e: DomainError| DomainError::Internal(e.to_string()))?;
    let user_id = take_string(attr::USER_ID)?;
    let featured_image = match data.remove(attr::FEATURED_IMAGE) {
        Some(Value::String(s)) if !s.is_empty() => match FileId::parse(s) {
            Ok(file_id) => Some(file_id),
            Err(e) => {
                tracing::warn!(key = %id, error = %e, "Ignoring unusable featured image");
                None
            }
        },
        _ => None,
    };
    let slug = Slug::parse(id).map_err(|e| DomainError::Internal(e.to_string()))?;

    Ok(Post {
        slug,
        title,
        content,
        featured_image,
        status,
        user_id,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::error::ErrorKind;
    use crate::ports::{DocumentList, MockDocumentStore, MockFileStorage};

    fn target() -> BlogTarget {
        BlogTarget::new("blog", "posts", "images")
    }

    fn service(documents: MockDocumentStore, files: MockFileStorage) -> BlogService {
        BlogService::new(Arc::new(documents), Arc::new(files), target())
    }

    fn post_document(slug: &str, status: &str) -> Document {
        let mut data = Map::new();
        data.insert("title".into(), Value::from("Hello"));
        data.insert("content".into(), Value::from("World"));
        data.insert("status".into(), Value::from(status));
        data.insert("userId".into(), Value::from("u1"));
        data.insert("featuredImage".into(), Value::Null);
        let now = Utc::now();
        Document {
            id: slug.to_string(),
            created_at: now,
            updated_at: now,
            data,
        }
    }

    fn new_post(slug: &str) -> NewPost {
        NewPost {
            slug: Slug::parse(slug).unwrap(),
            title: "Hello".to_string(),
            content: "World".to_string(),
            featured_image: None,
            status: PostStatus::Active,
            user_id: "u1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_posts_defaults_to_active_filter() {
        let mut documents = MockDocumentStore::new();
        documents
            .expect_list_documents()
            .withf(|collection, queries| {
                collection.collection_id == "posts" && queries == Query::active_posts().as_slice()
            })
            .times(1)
            .returning(|_, _| {
                Ok(DocumentList {
                    total: 1,
                    documents: vec![post_document("hello-world", "active")],
                })
            });

        let list = service(documents, MockFileStorage::new())
            .get_posts(None)
            .await
            .unwrap();

        assert_eq!(list.total, 1);
        assert_eq!(list.posts[0].slug.as_str(), "hello-world");
        assert_eq!(list.posts[0].featured_image, None);
    }

    #[tokio::test]
    async fn test_get_posts_skips_unreadable_documents() {
        let mut broken = post_document("broken", "archived");
        broken.data.remove("content");
        let mut documents = MockDocumentStore::new();
        documents.expect_list_documents().returning(move |_, _| {
            Ok(DocumentList {
                total: 3,
                documents: vec![
                    post_document("first", "active"),
                    broken.clone(),
                    post_document("second", "archived"),
                ],
            })
        });

        let list = service(documents, MockFileStorage::new())
            .get_posts(None)
            .await
            .unwrap();

        assert_eq!(list.total, 3);
        let slugs: Vec<_> = list.posts.iter().map(|post| post.slug.as_str()).collect();
        assert_eq!(slugs, ["first"]);
    }

    #[test]
    fn test_unusable_featured_image_is_dropped() {
        let mut document = post_document("hello-world", "active");
        document
            .data
            .insert("featuredImage".into(), Value::from("../../x"));

        let post = post_from_document(document).unwrap();
        assert_eq!(post.featured_image, None);
    }

    #[tokio::test]
    async fn test_get_posts_passes_caller_queries_through() {
        let mut documents = MockDocumentStore::new();
        documents
            .expect_list_documents()
            .withf(|_, queries| queries == [Query::limit(5)].as_slice())
            .times(1)
            .returning(|_, _| Ok(DocumentList::default()));

        let list = service(documents, MockFileStorage::new())
            .get_posts(Some(vec![Query::limit(5)]))
            .await
            .unwrap();

        assert!(list.posts.is_empty());
    }

    #[tokio::test]
    async fn test_get_post_not_found_is_none() {
        let mut documents = MockDocumentStore::new();
        documents
            .expect_get_document()
            .returning(|_, _| Err(PlatformError::NotFound("Document not found".into())));

        let slug = Slug::parse("missing").unwrap();
        let result = service(documents, MockFileStorage::new())
            .get_post(&slug)
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_post_transport_failure_is_unavailable() {
        let mut documents = MockDocumentStore::new();
        documents
            .expect_get_document()
            .returning(|_, _| Err(PlatformError::Transport("connection reset".into())));

        let slug = Slug::parse("hello-world").unwrap();
        let err = service(documents, MockFileStorage::new())
            .get_post(&slug)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_create_post_conflict() {
        let mut documents = MockDocumentStore::new();
        documents
            .expect_create_document()
            .returning(|_, _, _| Err(PlatformError::Conflict("Document already exists".into())));

        let err = service(documents, MockFileStorage::new())
            .create_post(new_post("hello-world"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_create_post_validates_before_calling_platform() {
        // No expectations: any platform call would fail the test.
        let documents = MockDocumentStore::new();
        let mut post = new_post("hello-world");
        post.content = String::new();

        let err = service(documents, MockFileStorage::new())
            .create_post(post)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_create_post_sends_slug_as_key_and_attributes() {
        let mut documents = MockDocumentStore::new();
        documents
            .expect_create_document()
            .withf(|_, id, data| {
                id == "hello-world"
                    && data.get("userId") == Some(&Value::from("u1"))
                    && data.get("status") == Some(&Value::from("active"))
                    && !data.contains_key("featuredImage")
            })
            .times(1)
            .returning(|_, id, _| Ok(post_document(id, "active")));

        let post = service(documents, MockFileStorage::new())
            .create_post(new_post("hello-world"))
            .await
            .unwrap();

        assert_eq!(post.title, "Hello");
        assert_eq!(post.user_id, "u1");
    }

    #[tokio::test]
    async fn test_update_post_sends_only_set_fields() {
        let mut documents = MockDocumentStore::new();
        documents
            .expect_update_document()
            .withf(|_, id, data| {
                id == "hello-world"
                    && data.len() == 1
                    && data.get("status") == Some(&Value::from("inactive"))
            })
            .times(1)
            .returning(|_, id, _| Ok(post_document(id, "inactive")));

        let slug = Slug::parse("hello-world").unwrap();
        let patch = PostPatch {
            status: Some(PostStatus::Inactive),
            ..Default::default()
        };
        let post = service(documents, MockFileStorage::new())
            .update_post(&slug, patch)
            .await
            .unwrap();

        assert_eq!(post.status, PostStatus::Inactive);
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let mut documents = MockDocumentStore::new();
        documents
            .expect_delete_document()
            .returning(|_, _| Err(PlatformError::NotFound("Document not found".into())));

        let slug = Slug::parse("gone").unwrap();
        let err = service(documents, MockFileStorage::new())
            .delete_post(&slug)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_upload_file_generates_id() {
        let mut files = MockFileStorage::new();
        files
            .expect_create_file()
            .withf(|bucket, id, upload| {
                bucket == "images" && id.as_str().len() == 32 && upload.name == "cover.png"
            })
            .times(1)
            .returning(|bucket, id, upload| {
                Ok(StoredFile {
                    id: id.clone(),
                    bucket_id: bucket.to_string(),
                    name: upload.name.clone(),
                    mime_type: upload.mime_type.clone(),
                    size: upload.size(),
                    created_at: Utc::now(),
                })
            });

        let stored = service(MockDocumentStore::new(), files)
            .upload_file(FileUpload::new("cover.png", "image/png", vec![0xAB; 8]))
            .await
            .unwrap();

        assert_eq!(stored.size, 8);
        assert_eq!(stored.bucket_id, "images");
    }

    #[tokio::test]
    async fn test_upload_empty_file_is_rejected() {
        let err = service(MockDocumentStore::new(), MockFileStorage::new())
            .upload_file(FileUpload::new("empty.png", "image/png", Vec::new()))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_file_preview_delegates_to_storage() {
        let mut files = MockFileStorage::new();
        files
            .expect_file_preview()
            .withf(|bucket, id| bucket == "images" && id.as_str() == "abc")
            .returning(|_, _| Ok("https://cloud.example/preview/abc".to_string()));

        let url = service(MockDocumentStore::new(), files)
            .file_preview(&FileId::new("abc"))
            .unwrap();
        assert_eq!(url, "https://cloud.example/preview/abc");
    }

    #[test]
    fn test_document_without_title_is_internal_error() {
        let mut document = post_document("hello-world", "active");
        document.data.remove("title");

        let err = post_from_document(document).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
