//! Structured logging setup for canvaslab binaries
//!
//! Every canvaslab binary installs its `tracing` subscriber through this
//! crate so that console and file output look the same across tools.
//!
//! # Features
//!
//! - **JSONL Output**: Structured JSON lines for log aggregation (default)
//! - **Pretty Console**: Human-readable output for development
//! - **File Rotation**: Daily/hourly log rotation via tracing-appender
//! - **Target Overrides**: Per-module levels from configuration, with
//!   `RUST_LOG` taking precedence when set
//!
//! # Quick Start
//!
//! ```ignore
//! use canvaslab_logging::{SubscriberBuilder, LogConfig};
//!
//! // Simple setup with defaults (JSONL to console)
//! let _guard = SubscriberBuilder::new().init();
//!
//! // Development mode with pretty human-readable output
//! let _guard = SubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init();
//! ```

pub mod config;
pub mod error;
pub mod layers;

pub use config::{ConsoleConfig, FileConfig, JsonlConfig, LogConfig, RotationStrategy};
pub use error::LoggingError;
pub use tracing_appender::non_blocking::WorkerGuard;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::layers::BoxedLayer;

/// Builder for configuring and initializing the canvaslab logging subscriber
///
/// By default, console output uses JSONL format. Use `LogConfig::development()`
/// for human-readable pretty output during development.
pub struct SubscriberBuilder {
    config: LogConfig,
}

impl SubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    ///
    /// Default: JSONL output to console
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    /// Get the configuration that will be installed
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Build the level filter: `RUST_LOG` if set, configured directives otherwise
    fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => Ok(EnvFilter::try_new(self.config.directives())?),
        }
    }

    /// Try to initialize the subscriber globally
    ///
    /// Returns the file writer guard when file output is enabled; it must be
    /// kept alive for the duration of the program so buffered lines flush.
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let env_filter = self.env_filter()?;

        let mut outputs: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;

        if self.config.console.enabled {
            outputs.push(layers::console_layer(
                &self.config.console,
                &self.config.jsonl,
            ));
        }

        if let Some(file_config) = &self.config.file {
            let (writer, file_guard) = layers::file_writer(file_config)?;
            outputs.push(layers::jsonl_layer(writer, &self.config.jsonl));
            guard = Some(file_guard);
        }

        tracing_subscriber::registry()
            .with(outputs)
            .with(env_filter)
            .try_init()
            .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

        Ok(guard)
    }

    /// Initialize the subscriber globally, reporting failures on stderr
    ///
    /// A second call in the same process leaves the first subscriber in place.
    pub fn init(self) -> Option<WorkerGuard> {
        match self.try_init() {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Warning: Failed to initialize logging: {}", e);
                None
            }
        }
    }
}

impl Default for SubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize logging with default settings (JSONL to console)
pub fn init_default() -> Option<WorkerGuard> {
    SubscriberBuilder::new().init()
}

/// Initialize logging for development (verbose, pretty console output)
pub fn init_development() -> Option<WorkerGuard> {
    SubscriberBuilder::new()
        .with_config(LogConfig::development())
        .init()
}

/// Initialize logging for testing (minimal output)
pub fn init_testing() {
    let _ = SubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .try_init();
}
