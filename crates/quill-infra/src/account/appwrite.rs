//! Appwrite account API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use quill_core::PlatformError;
use quill_core::domain::{Credentials, Session, UserProfile};
use quill_core::ports::AccountService;

use crate::appwrite::AppwriteClient;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSession {
    #[serde(rename = "$id")]
    id: String,
    user_id: String,
    expire: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAccount {
    #[serde(rename = "$id")]
    id: String,
    name: String,
    email: String,
    email_verification: bool,
    registration: DateTime<Utc>,
}

impl From<WireAccount> for UserProfile {
    fn from(wire: WireAccount) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            email: wire.email,
            email_verified: wire.email_verification,
            registered_at: wire.registration,
        }
    }
}

/// [`AccountService`] over `/account`. The session lives in the client's cookie jar.
#[derive(Clone)]
pub struct AppwriteAccount {
    client: AppwriteClient,
}

impl AppwriteAccount {
    /// `client` should come from [`AppwriteClient::session_client`].
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AccountService for AppwriteAccount {
    async fn create_email_session(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, PlatformError> {
        let request = self
            .client
            .request(Method::POST, "/account/sessions/email")
            .json(&json!({
                "email": credentials.email,
                "password": credentials.password,
            }));

        let wire: WireSession = self.client.send(request).await?;
        Ok(Session {
            id: wire.id,
            user_id: wire.user_id,
            expires_at: wire.expire,
        })
    }

    async fn get_current_user(&self) -> Result<UserProfile, PlatformError> {
        let request = self.client.request(Method::GET, "/account");

        let wire: WireAccount = self.client.send(request).await?;
        Ok(wire.into())
    }

    async fn delete_current_session(&self) -> Result<(), PlatformError> {
        let request = self
            .client
            .request(Method::DELETE, "/account/sessions/current");

        self.client.send_empty(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_account_maps_profile() {
        let wire: WireAccount = serde_json::from_value(json!({
            "$id": "64f1",
            "$createdAt": "2024-01-01T00:00:00.000+00:00",
            "$updatedAt": "2024-01-01T00:00:00.000+00:00",
            "name": "Jane",
            "registration": "2024-01-01T00:00:00.000+00:00",
            "status": true,
            "labels": [],
            "passwordUpdate": "2024-01-01T00:00:00.000+00:00",
            "email": "jane@example.com",
            "phone": "",
            "emailVerification": true,
            "phoneVerification": false,
            "mfa": false,
            "prefs": {},
            "targets": [],
            "accessedAt": "2024-01-01T00:00:00.000+00:00"
        }))
        .unwrap();

        let profile = UserProfile::from(wire);
        assert_eq!(profile.id, "64f1");
        assert!(profile.email_verified);
    }

    #[test]
    fn test_wire_session_parses() {
        let wire: WireSession = serde_json::from_value(json!({
            "$id": "s1",
            "userId": "64f1",
            "expire": "2025-01-01T00:00:00.000+00:00",
            "provider": "email"
        }))
        .unwrap();
        assert_eq!(wire.user_id, "64f1");
        assert_eq!(wire.id, "s1");
    }
}
