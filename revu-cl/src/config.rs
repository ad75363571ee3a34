//! Configuration resolution for revu-cl
//!
//! Each setting resolves ENV → TOML → default. The result is an explicit
//! config object handed to the components that need it: the gateway takes
//! the credentials, the classifier takes the concurrency limit, the
//! validator needs nothing.

use revu_common::config::{resolve_number, resolve_optional, TomlConfig};
use revu_common::{Error, Result};

use crate::llm::ycloud::DEFAULT_MODEL;
use crate::pipeline::DEFAULT_MAX_CONCURRENCY;

/// Default HTTP port for the classification service
pub const DEFAULT_BIND_PORT: u16 = 8701;

/// Resolved classifier service configuration
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub bind_port: u16,
    pub max_concurrency: usize,
    pub folder_id: String,
    pub api_key: String,
    pub model: String,
}

impl ClassifierConfig {
    /// Resolve from environment variables and the loaded TOML config
    ///
    /// Credentials are required; everything else has a default.
    pub fn resolve(toml: &TomlConfig) -> Result<Self> {
        let classifier = &toml.classifier;

        let folder_id = resolve_optional("REVU_YC_FOLDER_ID", classifier.folder_id.as_deref())
            .ok_or_else(|| {
                Error::Config(
                    "Yandex Cloud folder id not configured. Set REVU_YC_FOLDER_ID or \
                     [classifier] folder_id in revu.toml"
                        .to_string(),
                )
            })?;

        let api_key = resolve_optional("REVU_YC_API_KEY", classifier.api_key.as_deref())
            .ok_or_else(|| {
                Error::Config(
                    "Yandex Cloud API key not configured. Set REVU_YC_API_KEY or \
                     [classifier] api_key in revu.toml"
                        .to_string(),
                )
            })?;

        let model = resolve_optional("REVU_YC_MODEL", classifier.model.as_deref())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let bind_port = resolve_number("REVU_CL_PORT", classifier.bind_port, DEFAULT_BIND_PORT);

        let max_concurrency = resolve_number(
            "REVU_CL_MAX_CONCURRENCY",
            classifier.max_concurrency,
            DEFAULT_MAX_CONCURRENCY,
        );
        if max_concurrency == 0 {
            return Err(Error::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            bind_port,
            max_concurrency,
            folder_id,
            api_key,
            model,
        })
    }
}
