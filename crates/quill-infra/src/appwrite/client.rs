//! Shared HTTP plumbing for the Appwrite REST API.

use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use quill_core::PlatformError;

use super::{AppwriteConfig, RESPONSE_FORMAT};

const HEADER_PROJECT: &str = "x-appwrite-project";
const HEADER_KEY: &str = "x-appwrite-key";
const HEADER_RESPONSE_FORMAT: &str = "x-appwrite-response-format";

/// Error body returned by the platform on every non-2xx response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: u16,
    #[serde(default, rename = "type")]
    kind: String,
}

/// Thin wrapper around `reqwest::Client` with the project headers preset.
///
/// Session cookies live in a jar shared by every client derived from the
/// same root, so a session opened through one is seen by all of them.
#[derive(Clone)]
pub struct AppwriteClient {
    http: reqwest::Client,
    jar: Arc<Jar>,
    config: AppwriteConfig,
}

impl AppwriteClient {
    /// Client authenticated with the configured API key, if any.
    pub fn new(config: &AppwriteConfig) -> Result<Self, PlatformError> {
        Self::build(config.clone(), Arc::new(Jar::default()), true)
    }

    /// Client sharing this one's cookies but never sending the API key.
    /// Account endpoints reject server keys.
    pub fn session_client(&self) -> Result<Self, PlatformError> {
        Self::build(self.config.clone(), Arc::clone(&self.jar), false)
    }

    fn build(config: AppwriteConfig, jar: Arc<Jar>, with_key: bool) -> Result<Self, PlatformError> {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_PROJECT, header_value(&config.project_id)?);
        headers.insert(
            HEADER_RESPONSE_FORMAT,
            HeaderValue::from_static(RESPONSE_FORMAT),
        );
        if let Some(key) = config.api_key.as_deref().filter(|_| with_key) {
            let mut value = header_value(key)?;
            value.set_sensitive(true);
            headers.insert(HEADER_KEY, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_provider(Arc::clone(&jar))
            .timeout(config.timeout)
            .build()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        Ok(Self { http, jar, config })
    }

    pub fn config(&self) -> &AppwriteConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint, path)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Send and decode a JSON body.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, PlatformError> {
        let response = self.execute(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| PlatformError::Transport(format!("Malformed response: {e}")))
    }

    /// Send and discard the body.
    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> Result<(), PlatformError> {
        self.execute(request).await.map(|_| ())
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, PlatformError> {
        let response = request
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => {
                tracing::debug!(
                    status = status.as_u16(),
                    code = body.code,
                    kind = %body.kind,
                    "Platform rejected request"
                );
                body.message
            }
            Err(_) if text.is_empty() => status.to_string(),
            Err(_) => text,
        };
        Err(map_status(status.as_u16(), message))
    }
}

/// Encode one caller-supplied path segment.
///
/// Dot segments are refused outright: URL parsers collapse them even when
/// percent-encoded, which would move the request up the resource tree.
pub(crate) fn path_segment(value: &str) -> Result<String, PlatformError> {
    if value.is_empty() || value.chars().all(|c| c == '.') {
        return Err(PlatformError::Invalid(format!(
            "'{value}' is not a valid resource id"
        )));
    }
    Ok(urlencoding::encode(value).into_owned())
}

fn header_value(value: &str) -> Result<HeaderValue, PlatformError> {
    HeaderValue::from_str(value).map_err(|e| PlatformError::Invalid(e.to_string()))
}

/// Map an HTTP status onto the port error taxonomy.
pub(crate) fn map_status(status: u16, message: String) -> PlatformError {
    match status {
        400 => PlatformError::Invalid(message),
        401 | 403 => PlatformError::Unauthorized(message),
        404 => PlatformError::NotFound(message),
        409 => PlatformError::Conflict(message),
        _ => PlatformError::Platform { status, message },
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn config(api_key: Option<&str>) -> AppwriteConfig {
        AppwriteConfig {
            endpoint: "http://localhost/v1".to_string(),
            project_id: "quill".to_string(),
            api_key: api_key.map(str::to_string),
            database_id: "blog".to_string(),
            collection_id: "articles".to_string(),
            bucket_id: "images".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_map_status() {
        assert!(matches!(map_status(400, "x".into()), PlatformError::Invalid(_)));
        assert!(matches!(map_status(401, "x".into()), PlatformError::Unauthorized(_)));
        assert!(matches!(map_status(403, "x".into()), PlatformError::Unauthorized(_)));
        assert!(matches!(map_status(404, "x".into()), PlatformError::NotFound(_)));
        assert!(matches!(map_status(409, "x".into()), PlatformError::Conflict(_)));
        assert!(matches!(
            map_status(503, "x".into()),
            PlatformError::Platform { status: 503, .. }
        ));
    }

    #[test]
    fn test_error_body_parses() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"message":"Document with the requested ID could not be found.","code":404,"type":"document_not_found","version":"1.5.7"}"#,
        )
        .unwrap();

        assert_eq!(body.code, 404);
        assert_eq!(body.kind, "document_not_found");
    }

    #[test]
    fn test_path_segment_encodes_and_refuses_dot_segments() {
        assert_eq!(path_segment("hello-world").unwrap(), "hello-world");
        assert_eq!(path_segment("a/b?c").unwrap(), "a%2Fb%3Fc");

        assert!(matches!(path_segment(".."), Err(PlatformError::Invalid(_))));
        assert!(path_segment(".").is_err());
        assert!(path_segment("").is_err());
    }

    #[test]
    fn test_url_joins_endpoint() {
        let client = AppwriteClient::new(&config(Some("secret"))).unwrap();
        assert_eq!(client.url("/account"), "http://localhost/v1/account");

        let session = client.session_client().unwrap();
        assert_eq!(session.config().project_id, "quill");
    }
}
