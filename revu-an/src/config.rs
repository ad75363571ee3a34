//! Configuration resolution for revu-an

use revu_common::config::{resolve_number, resolve_string, TomlConfig};
use std::path::PathBuf;

/// Default HTTP port for the analytics service
pub const DEFAULT_BIND_PORT: u16 = 8702;

/// Default SQLite database file, relative to the working directory
pub const DEFAULT_DATABASE_PATH: &str = "revu.db";

/// Resolved analytics service configuration
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub bind_port: u16,
    pub database_path: PathBuf,
}

impl AnalyticsConfig {
    /// Resolve from environment variables and the loaded TOML config
    pub fn resolve(toml: &TomlConfig) -> Self {
        let database_path = resolve_string(
            "REVU_DB_PATH",
            toml.database_path.as_deref(),
            DEFAULT_DATABASE_PATH,
        );

        Self {
            bind_port: resolve_number("REVU_AN_PORT", toml.analytics.bind_port, DEFAULT_BIND_PORT),
            database_path: PathBuf::from(database_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let config = AnalyticsConfig::resolve(&TomlConfig::default());
        assert_eq!(config.bind_port, DEFAULT_BIND_PORT);
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
    }

    #[test]
    fn toml_values_override_defaults() {
        let toml = TomlConfig {
            database_path: Some("data/reviews.db".to_string()),
            analytics: revu_common::config::AnalyticsToml {
                bind_port: Some(9100),
            },
            ..Default::default()
        };

        let config = AnalyticsConfig::resolve(&toml);
        assert_eq!(config.bind_port, 9100);
        assert_eq!(config.database_path, PathBuf::from("data/reviews.db"));
    }
}
