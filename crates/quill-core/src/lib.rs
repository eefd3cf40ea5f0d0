//! # Quill Core
//!
//! The domain layer of Quill.
//! Posts, stored files, the authentication state and the blog façade,
//! with zero infrastructure dependencies.

pub mod auth;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, ErrorKind, PlatformError};
pub use services::{BlogService, BlogTarget};
