//! Account services - Appwrite sessions and in-memory fallback.

mod memory;
mod password;

#[cfg(feature = "appwrite")]
mod appwrite;

pub use memory::InMemoryAccountService;
pub use password::{Argon2PasswordHasher, PasswordError};

#[cfg(feature = "appwrite")]
pub use appwrite::AppwriteAccount;
