//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::{AppwriteConfig, ConfigError};

use crate::telemetry::TelemetryConfig;

/// Account created at startup when running on in-memory adapters.
#[derive(Clone)]
pub struct DemoAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for DemoAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoAccount")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Why the platform is unavailable, when it is.
    pub appwrite: Result<AppwriteConfig, ConfigError>,
    pub demo_account: Option<DemoAccount>,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            appwrite: AppwriteConfig::from_env(),
            demo_account: Self::demo_account(),
            telemetry: TelemetryConfig::from_env(),
        }
    }

    /// `QUILL_DEMO_EMAIL` and `QUILL_DEMO_PASSWORD` are both required;
    /// `QUILL_DEMO_NAME` defaults to "Demo".
    fn demo_account() -> Option<DemoAccount> {
        let email = env::var("QUILL_DEMO_EMAIL").ok()?;
        let password = env::var("QUILL_DEMO_PASSWORD").ok()?;

        Some(DemoAccount {
            name: env::var("QUILL_DEMO_NAME").unwrap_or_else(|_| "Demo".to_string()),
            email,
            password,
        })
    }
}
