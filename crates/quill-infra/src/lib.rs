//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the Appwrite REST adapters and their in-memory fallbacks.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No network client, in-memory only
//! - `appwrite` - Appwrite databases, storage and account adapters via reqwest

pub mod account;
pub mod appwrite;
pub mod documents;
pub mod storage;

mod custom_id;

// Re-exports - In-Memory
pub use account::{Argon2PasswordHasher, InMemoryAccountService, PasswordError};
pub use appwrite::{AppwriteConfig, ConfigError};
pub use documents::InMemoryDocumentStore;
pub use storage::InMemoryFileStorage;

// Re-exports - Appwrite
#[cfg(feature = "appwrite")]
pub use account::AppwriteAccount;
#[cfg(feature = "appwrite")]
pub use appwrite::AppwriteClient;
#[cfg(feature = "appwrite")]
pub use documents::AppwriteDatabases;
#[cfg(feature = "appwrite")]
pub use storage::AppwriteStorage;
