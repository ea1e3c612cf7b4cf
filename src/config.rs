//! Configuration management for the fraud detection app

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Classifier artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX classifier
    pub path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the form is served on
    pub bind_address: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from the default file (if present) and environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path.
    ///
    /// Layering: built-in defaults, then the file (optional), then
    /// `FRAUD_APP__<SECTION>__<KEY>` environment variables.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let defaults = Self::default();

        let config = Config::builder()
            .set_default("model.path", defaults.model.path)?
            .set_default("model.onnx_threads", defaults.model.onnx_threads as u64)?
            .set_default("server.bind_address", defaults.server.bind_address)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("FRAUD_APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                path: "models/rf_model.onnx".to_string(),
                onnx_threads: default_onnx_threads(),
            },
            server: ServerConfig {
                bind_address: "127.0.0.1:8501".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
