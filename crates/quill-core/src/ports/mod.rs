//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod account;
mod documents;
mod navigation;
mod storage;

pub use account::AccountService;
pub use documents::{CollectionRef, Document, DocumentList, DocumentStore};
pub use navigation::Navigator;
pub use storage::FileStorage;

#[cfg(test)]
pub use account::MockAccountService;
#[cfg(test)]
pub use documents::MockDocumentStore;
#[cfg(test)]
pub use navigation::MockNavigator;
#[cfg(test)]
pub use storage::MockFileStorage;
