//! Configuration file loading and value resolution
//!
//! Services resolve each setting with ENV → TOML → default priority.
//! There is no process-wide configuration singleton: each binary loads a
//! `TomlConfig` once and passes the resolved values into the components
//! that need them.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the TOML config file location
pub const CONFIG_PATH_ENV: &str = "REVU_CONFIG";

/// Default config file path, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "revu.toml";

/// Contents of the shared TOML config file
///
/// All fields are optional; missing values fall back to per-service
/// defaults after the environment has been consulted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// SQLite database file path
    pub database_path: Option<String>,
    /// Classification service settings
    #[serde(default)]
    pub classifier: ClassifierToml,
    /// Analytics service settings
    #[serde(default)]
    pub analytics: AnalyticsToml,
}

/// `[classifier]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClassifierToml {
    pub bind_port: Option<u16>,
    pub max_concurrency: Option<usize>,
    pub folder_id: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

/// `[analytics]` section
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalyticsToml {
    pub bind_port: Option<u16>,
}

/// Locate the config file: `REVU_CONFIG` env override, else `revu.toml`
pub fn config_file_path() -> PathBuf {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

/// Load the TOML config file
///
/// A missing file is not an error; services can run on env vars and
/// defaults alone. A file that exists but does not parse is an error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file found, using defaults");
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    tracing::info!(path = %path.display(), "Loaded config file");
    Ok(config)
}

/// Resolve a string setting with ENV → TOML → default priority
pub fn resolve_string(env_var: &str, toml_value: Option<&str>, default: &str) -> String {
    if let Ok(value) = std::env::var(env_var) {
        if !value.trim().is_empty() {
            return value;
        }
    }
    match toml_value {
        Some(value) if !value.trim().is_empty() => value.to_string(),
        _ => default.to_string(),
    }
}

/// Resolve an optional string setting with ENV → TOML priority
///
/// Returns `None` when neither source carries a non-empty value, leaving
/// the caller to decide whether the setting is required.
pub fn resolve_optional(env_var: &str, toml_value: Option<&str>) -> Option<String> {
    if let Ok(value) = std::env::var(env_var) {
        if !value.trim().is_empty() {
            return Some(value);
        }
    }
    toml_value
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.to_string())
}

/// Resolve a numeric setting with ENV → TOML → default priority
///
/// An env value that does not parse falls through to the TOML value with
/// a warning rather than aborting startup.
pub fn resolve_number<T>(env_var: &str, toml_value: Option<T>, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    if let Ok(value) = std::env::var(env_var) {
        match value.trim().parse::<T>() {
            Ok(parsed) => return parsed,
            Err(_) => {
                tracing::warn!(
                    env_var,
                    value = %value,
                    "Environment value is not numeric, falling back"
                );
            }
        }
    }
    toml_value.unwrap_or(default)
}
