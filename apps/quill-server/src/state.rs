//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::auth::AuthStore;
use quill_core::ports::{AccountService, DocumentStore, FileStorage};
use quill_core::{BlogService, BlogTarget};
use quill_infra::{InMemoryAccountService, InMemoryDocumentStore, InMemoryFileStorage};

use crate::config::{AppConfig, DemoAccount};

/// Which adapters the state was built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformMode {
    Appwrite,
    InMemory,
}

impl PlatformMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appwrite => "appwrite",
            Self::InMemory => "memory",
        }
    }
}

/// Shared application state.
///
/// The server is a single-user authoring desk: one [`AuthStore`] and one
/// platform session serve every request.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub auth: Arc<AuthStore>,
    pub account: Arc<dyn AccountService>,
    pub mode: PlatformMode,
}

struct Ports {
    documents: Arc<dyn DocumentStore>,
    files: Arc<dyn FileStorage>,
    account: Arc<dyn AccountService>,
    target: BlogTarget,
    mode: PlatformMode,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "appwrite")]
        let ports = match &config.appwrite {
            Ok(appwrite) => match appwrite_ports(appwrite) {
                Ok(ports) => {
                    tracing::info!(
                        endpoint = %appwrite.endpoint,
                        project = %appwrite.project_id,
                        "Appwrite adapters ready"
                    );
                    Some(ports)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to build Appwrite client: {}. Using in-memory fallback.",
                        e
                    );
                    None
                }
            },
            Err(e) => {
                tracing::warn!("{}. Running without Appwrite (in-memory mode).", e);
                None
            }
        };

        #[cfg(not(feature = "appwrite"))]
        let ports = {
            tracing::info!("Running without appwrite feature - using in-memory adapters");
            None
        };

        let ports = match ports {
            Some(ports) => ports,
            None => memory_ports(config.demo_account.as_ref()).await,
        };

        tracing::info!(mode = ports.mode.as_str(), "Application state initialized");
        Self::from_ports(ports)
    }

    fn from_ports(ports: Ports) -> Self {
        Self {
            blog: BlogService::new(ports.documents, ports.files, ports.target),
            auth: Arc::new(AuthStore::new()),
            account: ports.account,
            mode: ports.mode,
        }
    }

    /// State over fresh in-memory adapters with the given account service.
    #[cfg(test)]
    pub fn in_memory(account: Arc<dyn AccountService>) -> Self {
        Self::from_ports(Ports {
            documents: Arc::new(InMemoryDocumentStore::new()),
            files: Arc::new(InMemoryFileStorage::new()),
            account,
            target: memory_target(),
            mode: PlatformMode::InMemory,
        })
    }
}

#[cfg(feature = "appwrite")]
fn appwrite_ports(
    config: &quill_infra::AppwriteConfig,
) -> Result<Ports, quill_core::PlatformError> {
    use quill_infra::{AppwriteAccount, AppwriteClient, AppwriteDatabases, AppwriteStorage};

    let client = AppwriteClient::new(config)?;
    let session = client.session_client()?;

    Ok(Ports {
        documents: Arc::new(AppwriteDatabases::new(client.clone())),
        files: Arc::new(AppwriteStorage::new(client)),
        account: Arc::new(AppwriteAccount::new(session)),
        target: config.target(),
        mode: PlatformMode::Appwrite,
    })
}

fn memory_target() -> BlogTarget {
    BlogTarget::new("quill", "posts", "images")
}

async fn memory_ports(demo: Option<&DemoAccount>) -> Ports {
    let account = InMemoryAccountService::new();
    match demo {
        Some(demo) => {
            if let Err(e) = account
                .register(&demo.name, &demo.email, &demo.password)
                .await
            {
                tracing::error!("Failed to register demo account: {}", e);
            }
        }
        None => tracing::warn!(
            "QUILL_DEMO_EMAIL/QUILL_DEMO_PASSWORD not set. Nobody will be able to sign in."
        ),
    }

    Ports {
        documents: Arc::new(InMemoryDocumentStore::new()),
        files: Arc::new(InMemoryFileStorage::new()),
        account: Arc::new(account),
        target: memory_target(),
        mode: PlatformMode::InMemory,
    }
}
