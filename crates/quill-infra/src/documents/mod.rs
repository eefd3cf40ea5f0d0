//! Document store implementations - Appwrite databases and in-memory fallback.

mod memory;

#[cfg(feature = "appwrite")]
mod appwrite;

pub use memory::InMemoryDocumentStore;

#[cfg(feature = "appwrite")]
pub use appwrite::AppwriteDatabases;
