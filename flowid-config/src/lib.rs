//! # flowid Configuration System
//!
//! Layered configuration for the identifier pool manager: pool sizes per
//! `(direction, ident_type)` and telemetry settings.
//!
//! ## Features
//! - **Layered Loading**: defaults, YAML files, then `FLOWID_*` environment
//! - **Validation**: pool ranges must fit 16 bits and never repeat a pair
//! - **Core Conversion**: produces the `PoolConfig` handed to `IdentManager::bind`

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use flowid_core::types::PoolConfig;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

mod error;
mod pools;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use pools::PoolEntry;
pub use pools::PoolsConfig;
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/flowid.yaml";

/// Top‑level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct FlowIdConfig {
    /// Identifier pools to build at bind time.
    #[validate(nested)]
    #[serde(default)]
    pub pools: PoolsConfig,

    /// Logging and metrics.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl FlowIdConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default Values
    /// 2. `config/flowid.yaml` - Base settings. If missing, defaults are used.
    /// 3. `config/<FLOWID_ENV>.yaml` - Environment‑specific overrides.
    /// 4. `FLOWID_*` environment variables, `__` separating nested keys.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(FlowIdConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        } else {
            info!("{} not found, using default configuration", BASE_FILE);
        }

        let env = std::env::var("FLOWID_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment.merge(Env::prefixed("FLOWID_").split("__")))
    }

    /// Load configuration from a specific path for testing/validation.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        Self::extract(
            Figment::new()
                .merge(Yaml::file(path))
                .merge(Env::prefixed("FLOWID_").split("__")),
        )
    }

    /// Builds the validated core pool table.
    pub fn pool_config(&self) -> Result<PoolConfig, ConfigError> {
        let config = self.pools.to_pool_config();
        config.validate()?;
        Ok(config)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}
