use std::time::Duration;

use thiserror::Error;

use quill_core::BlogTarget;

/// Version of the response schema the adapters are written against.
pub const RESPONSE_FORMAT: &str = "1.5.0";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),
}

/// Connection settings for one Appwrite project.
#[derive(Debug, Clone)]
pub struct AppwriteConfig {
    /// API endpoint including the version segment (e.g., https://cloud.appwrite.io/v1)
    pub endpoint: String,
    pub project_id: String,
    /// Server key. Without it every call runs as the signed-in session.
    pub api_key: Option<String>,
    pub database_id: String,
    pub collection_id: String,
    pub bucket_id: String,
    pub timeout: Duration,
}

impl AppwriteConfig {
    /// Load configuration from environment variables.
    ///
    /// Every identifier is required; `APPWRITE_API_KEY` and
    /// `APPWRITE_TIMEOUT_SECS` (default 30) are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: required("APPWRITE_URL")?
                .trim_end_matches('/')
                .to_string(),
            project_id: required("APPWRITE_PROJECT_ID")?,
            api_key: std::env::var("APPWRITE_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            database_id: required("APPWRITE_DATABASE_ID")?,
            collection_id: required("APPWRITE_COLLECTION_ID")?,
            bucket_id: required("APPWRITE_BUCKET_ID")?,
            timeout: Duration::from_secs(
                std::env::var("APPWRITE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        })
    }

    /// Collection and bucket the blog service should work against.
    pub fn target(&self) -> BlogTarget {
        BlogTarget::new(&self.database_id, &self.collection_id, &self.bucket_id)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}
