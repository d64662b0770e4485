//! Configuration loading and startup wiring
//!
//! The backend is chosen here, once, at startup. Nothing else in the crate
//! branches on the store kind — the adapter fronts whichever backend this
//! module builds.

use crate::adapter::{RetryPolicy, StoreAdapter};
use crate::core::error::{ConfigError, SwapResult};
use crate::core::service::ListingStore;
use crate::images::ImagePolicy;
use crate::storage::{InMemoryStore, LocalFileStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Which store holds the listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Volatile session state; gone when the process exits.
    Memory,
    /// One JSON blob on disk, with an optional byte quota.
    Local {
        path: PathBuf,
        #[serde(default)]
        quota_bytes: Option<u64>,
    },
    /// Remote JSON document collection (requires the `remote` feature).
    Remote { base_url: String },
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::Memory
    }
}

/// Complete startup configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwapConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub image: ImagePolicy,
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl SwapConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: &str) -> SwapResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: format!("{}: {}", path, e),
        })?;
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                file: Some(path.to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> SwapResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Build the configured backend and connect an adapter to it.
pub async fn build_adapter(config: &SwapConfig) -> SwapResult<StoreAdapter> {
    let store: Arc<dyn ListingStore> = match &config.backend {
        BackendConfig::Memory => Arc::new(InMemoryStore::new()),
        BackendConfig::Local { path, quota_bytes } => {
            Arc::new(LocalFileStore::new(path, *quota_bytes))
        }
        #[cfg(feature = "remote")]
        BackendConfig::Remote { base_url } => {
            Arc::new(crate::storage::RemoteStore::new(base_url.clone()))
        }
        #[cfg(not(feature = "remote"))]
        BackendConfig::Remote { .. } => {
            return Err(ConfigError::InvalidValue {
                field: "backend.kind".to_string(),
                message: "remote backend requires the 'remote' feature".to_string(),
            }
            .into());
        }
    };

    StoreAdapter::connect(store, config.image, config.retry).await
}
