//! Configuration types for the logging system

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default log level (can be overridden by RUST_LOG)
    pub default_level: String,

    /// Console output configuration
    pub console: ConsoleConfig,

    /// File output configuration
    pub file: Option<FileConfig>,

    /// JSONL output configuration
    pub jsonl: JsonlConfig,

    /// Per-target level overrides, e.g. `tower_http = "debug"`
    pub targets: BTreeMap<String, String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
            console: ConsoleConfig::default(),
            file: None,
            jsonl: JsonlConfig::default(),
            targets: BTreeMap::new(),
        }
    }
}

impl LogConfig {
    /// Verbose, colored console output with request tracing
    pub fn development() -> Self {
        Self {
            default_level: "debug".to_string(),
            console: ConsoleConfig {
                enabled: true,
                pretty: true,
                ansi: true,
            },
            targets: BTreeMap::from([("tower_http".to_string(), "debug".to_string())]),
            ..Default::default()
        }
    }

    /// Create a config for production (JSONL file output, no console)
    pub fn production(log_dir: PathBuf) -> Self {
        Self {
            default_level: "info".to_string(),
            console: ConsoleConfig {
                enabled: false,
                pretty: false,
                ansi: false,
            },
            file: Some(FileConfig {
                directory: log_dir,
                ..FileConfig::default()
            }),
            ..Default::default()
        }
    }

    /// Create a config for testing (minimal output)
    pub fn testing() -> Self {
        Self {
            default_level: "warn".to_string(),
            console: ConsoleConfig {
                enabled: true,
                pretty: false,
                ansi: false,
            },
            ..Default::default()
        }
    }

    /// Filter directives for `EnvFilter`: the default level followed by
    /// each target override
    pub fn directives(&self) -> String {
        std::iter::once(self.default_level.clone())
            .chain(
                self.targets
                    .iter()
                    .map(|(target, level)| format!("{target}={level}")),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Console output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Enable console output
    pub enabled: bool,
    /// Use pretty (human-readable) format
    pub pretty: bool,
    /// Include ANSI colors
    pub ansi: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // JSONL unless asked for pretty output
            pretty: false,
            ansi: false,
        }
    }
}

/// File output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Directory for log files
    pub directory: PathBuf,
    /// File name prefix
    pub prefix: String,
    /// Rotation strategy
    pub rotation: RotationStrategy,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./logs"),
            prefix: "canvaslab".to_string(),
            rotation: RotationStrategy::Daily,
        }
    }
}

/// File rotation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationStrategy {
    /// Rotate daily
    #[default]
    Daily,
    /// Rotate hourly
    Hourly,
    /// Never rotate (single file)
    Never,
}

/// JSONL formatting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonlConfig {
    /// Flatten event fields to root level
    pub flatten_events: bool,
    /// Include span list in events
    pub include_spans: bool,
    /// Include current span details
    pub include_current_span: bool,
    /// Include thread information
    pub include_thread_info: bool,
    /// Include file/line information
    pub include_location: bool,
}

impl Default for JsonlConfig {
    fn default() -> Self {
        Self {
            flatten_events: true,
            include_spans: true,
            include_current_span: true,
            include_thread_info: false,
            include_location: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.directives(), "info");
        assert!(config.console.enabled && !config.console.pretty);
        assert!(config.file.is_none());
    }

    #[test]
    fn test_development_traces_requests() {
        let config = LogConfig::development();
        assert!(config.console.pretty && config.console.ansi);
        assert_eq!(config.directives(), "debug,tower_http=debug");
    }

    #[test]
    fn test_production_config() {
        let config = LogConfig::production(PathBuf::from("/var/log/canvaslab"));
        assert!(!config.console.enabled);
        let file = config.file.unwrap();
        assert_eq!(file.directory, PathBuf::from("/var/log/canvaslab"));
        assert_eq!(file.rotation, RotationStrategy::Daily);
    }

    #[test]
    fn test_directives() {
        let mut config = LogConfig::default();
        assert_eq!(config.directives(), "info");

        config.targets.insert("tower_http".into(), "debug".into());
        config.targets.insert("canvaslab_storage".into(), "trace".into());
        assert_eq!(
            config.directives(),
            "info,canvaslab_storage=trace,tower_http=debug"
        );
    }

    #[test]
    fn test_partial_toml() {
        let config: LogConfig = toml::from_str(
            r#"
            default_level = "debug"

            [file]
            directory = "/tmp/logs"
            rotation = "never"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_level, "debug");
        assert!(config.console.enabled);
        let file = config.file.unwrap();
        assert_eq!(file.prefix, "canvaslab");
        assert_eq!(file.rotation, RotationStrategy::Never);
    }
}
