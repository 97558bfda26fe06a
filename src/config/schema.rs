//! Configuration schema types for `pxsheet.toml`
//!
//! Every section and key is optional; a missing file behaves like an empty one.

use crate::png::MAX_COMPRESSION;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where definitions are read from and sheets are written to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directory holding sprite definition sources
    #[serde(default = "default_definitions")]
    pub definitions: PathBuf,
    /// Directory the sheets are written to
    #[serde(default = "default_out")]
    pub out: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { definitions: default_definitions(), out: default_out() }
    }
}

fn default_definitions() -> PathBuf {
    PathBuf::from("sprites/definitions")
}

fn default_out() -> PathBuf {
    PathBuf::from("assets/sprites")
}

/// What gets written for each sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Write a `<name>.json` metadata sidecar next to each sheet
    #[serde(default = "default_true")]
    pub metadata: bool,
    /// zlib compression level for the PNG data, 0-9
    #[serde(default = "default_compression")]
    pub compression: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { metadata: true, compression: default_compression() }
    }
}

fn default_true() -> bool {
    true
}

fn default_compression() -> u32 {
    MAX_COMPRESSION
}

/// Complete pxsheet.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PxsheetConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "output.compression")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pxsheet.toml: '{}' {}", self.field, self.message)
    }
}

impl PxsheetConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.project.definitions.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "project.definitions".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        }

        if self.project.out.as_os_str().is_empty() {
            errors.push(ConfigValidationError {
                field: "project.out".to_string(),
                message: "must be a non-empty path".to_string(),
            });
        }

        if self.output.compression > MAX_COMPRESSION {
            errors.push(ConfigValidationError {
                field: "output.compression".to_string(),
                message: format!("must be between 0 and {}", MAX_COMPRESSION),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
