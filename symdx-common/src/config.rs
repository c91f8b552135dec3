//! Configuration loading
//!
//! Bootstrap settings only: listen address, where the artifacts live, where
//! the chart is written, and logging. Values are resolved in this order:
//!
//! 1. Command-line arguments / environment (applied by the binary)
//! 2. TOML config file (explicit path, `./symdx.toml`, then
//!    `<config_dir>/symdx/config.toml`)
//! 3. Compiled defaults
//!
//! A missing config file is never fatal; an explicitly named one is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File name probed in the working directory
pub const LOCAL_CONFIG_FILE: &str = "symdx.toml";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listen host
    ///
    /// Default: 127.0.0.1
    pub host: String,

    /// Listen port
    ///
    /// Default: 5000
    pub port: u16,

    /// Directory that artifact and metrics file names are resolved against
    pub artifact_dir: PathBuf,

    /// Directory the dashboard chart is written to and served from
    pub static_dir: PathBuf,

    /// Artifact file names
    pub artifacts: ArtifactFiles,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// File names of the serialized artifacts, relative to `artifact_dir`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArtifactFiles {
    pub classifier: PathBuf,
    pub vectorizer: PathBuf,
    pub label_encoder: PathBuf,
    pub metrics: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

/// Fully resolved artifact locations
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub vectorizer: PathBuf,
    pub label_encoder: PathBuf,
    pub metrics: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            artifact_dir: PathBuf::from("."),
            static_dir: PathBuf::from("static"),
            artifacts: ArtifactFiles::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ArtifactFiles {
    fn default() -> Self {
        Self {
            classifier: PathBuf::from("symptom_classifier_model.json"),
            vectorizer: PathBuf::from("vectorizer.json"),
            label_encoder: PathBuf::from("label_encoder.json"),
            metrics: PathBuf::from("metrics.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration
    ///
    /// With `explicit` set, that file must exist and parse. Otherwise the
    /// first existing candidate from [`candidate_paths`] is used, falling
    /// back to defaults when none exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        for candidate in candidate_paths() {
            if candidate.exists() {
                return Self::from_file(&candidate);
            }
        }

        warn!("No config file found, using compiled defaults");
        Ok(Self::default())
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse TOML text; absent keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Artifact and metrics paths joined onto `artifact_dir`
    ///
    /// Absolute file names are kept as-is.
    pub fn artifact_paths(&self) -> ArtifactPaths {
        let dir = &self.artifact_dir;
        ArtifactPaths {
            classifier: dir.join(&self.artifacts.classifier),
            vectorizer: dir.join(&self.artifacts.vectorizer),
            label_encoder: dir.join(&self.artifacts.label_encoder),
            metrics: dir.join(&self.artifacts.metrics),
        }
    }
}

/// Config file locations probed when no explicit path is given
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("symdx").join("config.toml"));
    }
    paths
}
