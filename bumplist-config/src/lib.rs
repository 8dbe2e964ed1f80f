//! # Bumplist Configuration
//!
//! Layered configuration for the allocator demo: built-in defaults, YAML
//! files, then `BUMPLIST_*` environment variables, validated once after
//! merging.

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod allocator;
mod error;
mod telemetry;
mod validation;

pub use allocator::AllocatorConfig;
pub use allocator::Strategy;
pub use error::ConfigError;
pub use telemetry::TelemetryConfig;

/// Base configuration file, relative to the working directory.
pub const BASE_CONFIG_PATH: &str = "config/bumplist.yaml";

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq, Eq)]
pub struct BumplistConfig {
    /// Allocation strategy and arena sizing.
    #[serde(default)]
    #[validate(nested)]
    pub allocator: AllocatorConfig,

    /// Logging and metrics.
    #[serde(default)]
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

impl BumplistConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/bumplist.yaml`, if present
    /// 3. `config/<BUMPLIST_ENV>.yaml`, if present (`BUMPLIST_ENV` defaults to `production`)
    /// 4. `BUMPLIST_*` environment variables, `__` separating sections
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(BumplistConfig::default()));

        if Path::new(BASE_CONFIG_PATH).exists() {
            figment = figment.merge(Yaml::file(BASE_CONFIG_PATH));
        }

        let env = std::env::var("BUMPLIST_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment.merge(Env::prefixed("BUMPLIST_").split("__")))
    }

    /// Load configuration from a specific file, then environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        Self::extract(
            Figment::from(Serialized::defaults(BumplistConfig::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed("BUMPLIST_").split("__")),
        )
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}
