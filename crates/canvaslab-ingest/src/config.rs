//! Service configuration
//!
//! Loaded from an optional TOML file; every section has defaults so an
//! empty file (or no file) gives a working local setup. Command-line flags
//! are applied on top with [`IngestConfig::apply_serve_args`].

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use canvaslab_logging::LogConfig;
use canvaslab_storage::{InMemoryKvStore, KvStore, RedbKvStore, RedbStorageConfig, StorageError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::cli::ServeArgs;

/// Errors loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config {path}: {source}")]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Store backend settings
    pub storage: StorageConfig,
    /// Logging settings
    pub logging: LogConfig,
}

impl IngestConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Override file values with flags given on the command line
    pub fn apply_serve_args(&mut self, args: &ServeArgs) {
        if let Some(bind) = args.bind {
            self.server.bind = bind;
        }
        if args.cors {
            self.server.cors = true;
        }
        if args.memory {
            self.storage.backend = StorageBackend::Memory;
        }
        if let Some(db) = &args.db {
            self.storage.backend = StorageBackend::Redb;
            self.storage.path = db.clone();
        }
        if let Some(level) = &args.log_level {
            self.logging.default_level = level.clone();
        }
        if args.pretty {
            self.logging.console.pretty = true;
            self.logging.console.ansi = true;
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: SocketAddr,
    /// Answer CORS preflights and allow any origin
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            cors: false,
        }
    }
}

/// Which store backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local, lost on exit
    Memory,
    /// Durable redb file
    #[default]
    Redb,
}

/// Store backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend kind
    pub backend: StorageBackend,
    /// Database file for the redb backend
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: RedbStorageConfig::default().db_path,
        }
    }
}

impl StorageConfig {
    /// Open the configured store
    pub fn open(&self) -> Result<Arc<dyn KvStore>, StorageError> {
        match self.backend {
            StorageBackend::Memory => {
                info!("Using in-memory store");
                Ok(Arc::new(InMemoryKvStore::new()))
            }
            StorageBackend::Redb => Ok(Arc::new(RedbKvStore::open(RedbStorageConfig {
                db_path: self.path.clone(),
            })?)),
        }
    }
}
