//! Configuration loading and discovery for `pxsheet.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::PxsheetConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "pxsheet.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    /// TOML parsing error
    #[error("Failed to parse {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override definitions directory
    pub src: Option<PathBuf>,
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Skip metadata sidecars
    pub no_metadata: bool,
    /// Override compression level
    pub compression: Option<u32>,
}

/// Find pxsheet.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find pxsheet.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.is_file() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// If a path is provided, loads from that file (which must exist). Otherwise
/// uses [`find_config`], falling back to [`default_config`] when no file is
/// found. Relative paths in a loaded file are resolved against the directory
/// the file lives in.
pub fn load_config(path: Option<&Path>) -> Result<PxsheetConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<PxsheetConfig, ConfigError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let mut config: PxsheetConfig = toml::from_str(&contents)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(root) = project_root(path) {
        config.project.definitions = resolve_path(root, &config.project.definitions);
        config.project.out = resolve_path(root, &config.project.out);
    }

    Ok(config)
}

/// Configuration used when no pxsheet.toml is found.
///
/// Paths stay relative, so they resolve against the current directory.
pub fn default_config() -> PxsheetConfig {
    PxsheetConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The result is
/// validated again, since a flag can carry an out-of-range value too.
pub fn merge_cli_overrides(
    config: &mut PxsheetConfig,
    overrides: &CliOverrides,
) -> Result<(), ConfigError> {
    if let Some(ref src) = overrides.src {
        config.project.definitions = src.clone();
    }

    if let Some(ref out) = overrides.out {
        config.project.out = out.clone();
    }

    if overrides.no_metadata {
        config.output.metadata = false;
    }

    if let Some(compression) = overrides.compression {
        config.output.compression = compression;
    }

    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Get the project root directory from a config file path.
///
/// A bare file name has the current directory as its root.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// Resolve a path relative to the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}
