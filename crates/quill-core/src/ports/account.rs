//! Account and session port.

use async_trait::async_trait;

use crate::domain::{Credentials, Session, UserProfile};
use crate::error::PlatformError;

/// Account service trait - the platform's session management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Open a session with email and password.
    async fn create_email_session(&self, credentials: &Credentials)
    -> Result<Session, PlatformError>;

    /// Profile of the account behind the current session.
    async fn get_current_user(&self) -> Result<UserProfile, PlatformError>;

    /// Close the current session.
    async fn delete_current_session(&self) -> Result<(), PlatformError>;
}
