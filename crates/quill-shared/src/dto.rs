//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to login.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Describes the login form: where to post it and which fields it takes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginFormResponse {
    pub action: String,
    pub method: String,
    pub fields: Vec<String>,
}

/// Response containing the signed-in account's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub registered_at: String,
}

/// Request to create a post. Without a slug one is derived from the title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub content: String,
    #[serde(default)]
    pub featured_image: Option<String>,
    /// `active` (default) or `inactive`.
    #[serde(default)]
    pub status: Option<String>,
}

/// Partial update of a post; absent fields are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub featured_image: Option<String>,
    /// Preview reference for the featured image, when there is one.
    pub featured_image_url: Option<String>,
    pub status: String,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub total: u64,
    pub posts: Vec<PostResponse>,
}

/// Metadata of an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResponse {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub preview_url: String,
    pub created_at: String,
}
