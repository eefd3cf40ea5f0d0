//! Login and logout flows.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use thiserror::Error;

use super::AuthStore;
use crate::domain::{Credentials, Route, UserProfile};
use crate::error::PlatformError;
use crate::ports::{AccountService, Navigator};

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Failure surfaced to the person signing in. `Display` is the message to show.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Rejected(String),
}

impl From<PlatformError> for LoginError {
    fn from(err: PlatformError) -> Self {
        Self::Rejected(err.message().to_string())
    }
}

/// Check the form before anything is sent to the platform.
pub fn validate_credentials(credentials: &Credentials) -> Result<(), LoginError> {
    if credentials.email.trim().is_empty() {
        return Err(LoginError::Invalid("Email is required".to_string()));
    }
    if !email_regex().is_match(credentials.email.trim()) {
        return Err(LoginError::Invalid(
            "Email address must be a valid address".to_string(),
        ));
    }
    if credentials.password.is_empty() {
        return Err(LoginError::Invalid("Password is required".to_string()));
    }
    Ok(())
}

/// Sign in: open a session, fetch the profile, publish it, go home.
pub struct LoginFlow {
    account: Arc<dyn AccountService>,
    store: Arc<AuthStore>,
    navigator: Arc<dyn Navigator>,
}

impl LoginFlow {
    pub fn new(
        account: Arc<dyn AccountService>,
        store: Arc<AuthStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            account,
            store,
            navigator,
        }
    }

    /// On any failure the store is untouched and no navigation happens.
    pub async fn submit(&self, credentials: Credentials) -> Result<UserProfile, LoginError> {
        validate_credentials(&credentials)?;

        let session = self
            .account
            .create_email_session(&credentials)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Login rejected"))?;
        tracing::debug!(session_id = %session.id, "Session created");

        let profile = self
            .account
            .get_current_user()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Could not load signed-in profile"))?;

        self.store.login(profile.clone());
        self.navigator.navigate(Route::Home);
        Ok(profile)
    }
}

/// Sign out: close the platform session, clear the store, go to the login page.
pub struct LogoutFlow {
    account: Arc<dyn AccountService>,
    store: Arc<AuthStore>,
    navigator: Arc<dyn Navigator>,
}

impl LogoutFlow {
    pub fn new(
        account: Arc<dyn AccountService>,
        store: Arc<AuthStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            account,
            store,
            navigator,
        }
    }

    /// A platform failure leaves the local state signed in.
    pub async fn submit(&self) -> Result<(), PlatformError> {
        self.account
            .delete_current_session()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Logout failed"))?;

        self.store.logout();
        self.navigator.navigate(Route::Login);
        Ok(())
    }
}
