//! Domain entities - the core business objects.

mod auth;
mod file;
mod post;
mod query;
mod slug;
mod user;

pub use auth::{AuthState, Route};
pub use file::{FileId, FileUpload, StoredFile};
pub use post::{NewPost, Post, PostList, PostPatch, PostStatus};
pub use query::Query;
pub use slug::{SLUG_MAX_LEN, Slug};
pub use user::{Credentials, Session, UserProfile};
