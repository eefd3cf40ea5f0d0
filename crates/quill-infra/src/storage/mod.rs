//! File storage implementations - Appwrite buckets and in-memory fallback.

mod memory;

#[cfg(feature = "appwrite")]
mod appwrite;

pub use memory::InMemoryFileStorage;

#[cfg(feature = "appwrite")]
pub use appwrite::AppwriteStorage;
