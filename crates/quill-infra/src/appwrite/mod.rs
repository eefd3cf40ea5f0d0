//! Appwrite REST client and configuration.

mod config;

#[cfg(feature = "appwrite")]
mod client;

pub use config::{AppwriteConfig, ConfigError, RESPONSE_FORMAT};

#[cfg(feature = "appwrite")]
pub use client::AppwriteClient;
#[cfg(feature = "appwrite")]
pub(crate) use client::path_segment;
