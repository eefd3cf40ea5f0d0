//! In-memory account service - a single local session over registered accounts.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::PlatformError;
use quill_core::domain::{Credentials, Session, UserProfile};
use quill_core::ports::AccountService;

use super::{Argon2PasswordHasher, PasswordError};

const INVALID_CREDENTIALS: &str = "Invalid credentials. Please check the email and password.";
const MISSING_SCOPE: &str = "User (role: guests) missing scope (account)";
const SESSION_ACTIVE: &str = "Creation of a session is prohibited when a session is active.";
const ALREADY_EXISTS: &str = "A user with the same id, email, or phone already exists in this project.";

const SESSION_LIFETIME_DAYS: i64 = 365;

struct Account {
    profile: UserProfile,
    password_hash: String,
}

/// Accounts keyed by lowercase email, with at most one open session.
pub struct InMemoryAccountService {
    hasher: Argon2PasswordHasher,
    accounts: RwLock<HashMap<String, Account>>,
    session: RwLock<Option<Session>>,
}

impl InMemoryAccountService {
    pub fn new() -> Self {
        Self {
            hasher: Argon2PasswordHasher::new(),
            accounts: RwLock::new(HashMap::new()),
            session: RwLock::new(None),
        }
    }

    /// Create an account that can later sign in.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, PlatformError> {
        let key = email.trim().to_lowercase();
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&key) {
            return Err(PlatformError::Conflict(ALREADY_EXISTS.to_string()));
        }

        let password_hash = self.hasher.hash(password).map_err(internal)?;
        let profile = UserProfile {
            id: Uuid::new_v4().simple().to_string(),
            name: name.to_string(),
            email: email.trim().to_string(),
            email_verified: false,
            registered_at: Utc::now(),
        };
        accounts.insert(
            key,
            Account {
                profile: profile.clone(),
                password_hash,
            },
        );

        tracing::info!(user_id = %profile.id, "Local account registered");
        Ok(profile)
    }
}

impl Default for InMemoryAccountService {
    fn default() -> Self {
        Self::new()
    }
}

fn internal(err: PasswordError) -> PlatformError {
    PlatformError::Platform {
        status: 500,
        message: err.to_string(),
    }
}

#[async_trait]
impl AccountService for InMemoryAccountService {
    async fn create_email_session(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, PlatformError> {
        let mut session = self.session.write().await;
        if session.is_some() {
            return Err(PlatformError::Unauthorized(SESSION_ACTIVE.to_string()));
        }

        let accounts = self.accounts.read().await;
        let account = accounts
            .get(&credentials.email.trim().to_lowercase())
            .ok_or_else(|| PlatformError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;
        if !self
            .hasher
            .verify(&credentials.password, &account.password_hash)
            .map_err(internal)?
        {
            return Err(PlatformError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let opened = Session {
            id: Uuid::new_v4().simple().to_string(),
            user_id: account.profile.id.clone(),
            expires_at: Utc::now() + Duration::days(SESSION_LIFETIME_DAYS),
        };
        *session = Some(opened.clone());
        Ok(opened)
    }

    async fn get_current_user(&self) -> Result<UserProfile, PlatformError> {
        let session = self.session.read().await;
        let user_id = session
            .as_ref()
            .map(|s| s.user_id.as_str())
            .ok_or_else(|| PlatformError::Unauthorized(MISSING_SCOPE.to_string()))?;

        let accounts = self.accounts.read().await;
        accounts
            .values()
            .find(|account| account.profile.id == user_id)
            .map(|account| account.profile.clone())
            .ok_or_else(|| PlatformError::Unauthorized(MISSING_SCOPE.to_string()))
    }

    async fn delete_current_session(&self) -> Result<(), PlatformError> {
        self.session
            .write()
            .await
            .take()
            .map(|_| ())
            .ok_or_else(|| PlatformError::Unauthorized(MISSING_SCOPE.to_string()))
    }
}
