use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FileId, Slug};
use crate::error::DomainError;

/// Publication status of a post. Only `Active` posts are listed by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Active,
    Inactive,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(DomainError::Validation(format!(
                "unknown post status '{other}'"
            ))),
        }
    }
}

/// Post entity - a blog post keyed by its slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub slug: Slug,
    pub title: String,
    pub content: String,
    pub featured_image: Option<FileId>,
    pub status: PostStatus,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Everything needed to create a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub slug: Slug,
    pub title: String,
    pub content: String,
    pub featured_image: Option<FileId>,
    pub status: PostStatus,
    pub user_id: String,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("title is required".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(DomainError::Validation("content is required".to_string()));
        }
        if self.user_id.trim().is_empty() {
            return Err(DomainError::Validation("user id is required".to_string()));
        }
        Ok(())
    }
}

/// Partial update of a post. Owner and slug are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<FileId>,
    pub status: Option<PostStatus>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.featured_image.is_none()
            && self.status.is_none()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.is_empty() {
            return Err(DomainError::Validation(
                "update must change at least one field".to_string(),
            ));
        }
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(DomainError::Validation("title cannot be blank".to_string()));
        }
        if self.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(DomainError::Validation("content cannot be blank".to_string()));
        }
        Ok(())
    }
}

/// One page of posts as returned by a listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostList {
    pub total: u64,
    pub posts: Vec<Post>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post() -> NewPost {
        NewPost {
            slug: Slug::parse("hello-world").unwrap(),
            title: "Hello".to_string(),
            content: "World".to_string(),
            featured_image: None,
            status: PostStatus::Active,
            user_id: "u1".to_string(),
        }
    }

    #[test]
    fn test_status_round_trips_through_str() {
        assert_eq!("inactive".parse::<PostStatus>().unwrap(), PostStatus::Inactive);
        assert_eq!(PostStatus::Active.to_string(), "active");
        assert!("draft".parse::<PostStatus>().is_err());
    }

    #[test]
    fn test_new_post_requires_fields() {
        assert!(new_post().validate().is_ok());

        let mut post = new_post();
        post.title = "   ".to_string();
        assert!(post.validate().is_err());

        let mut post = new_post();
        post.user_id = String::new();
        assert!(post.validate().is_err());
    }

    #[test]
    fn test_empty_patch_is_rejected() {
        assert!(PostPatch::default().validate().is_err());

        let patch = PostPatch {
            status: Some(PostStatus::Inactive),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }
}
