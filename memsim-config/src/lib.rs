//! # memsim Configuration System
//!
//! Layered configuration for the memory simulator.
//!
//! Hierarchy (later layers win):
//! 1. Default values
//! 2. `config/memsim.yaml`
//! 3. `config/<MEMSIM_ENV>.yaml`
//! 4. `MEMSIM_*` environment variables, nested with `__`

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod simulator;
mod size;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use simulator::{HeapConfig, RegistryConfig};
pub use size::parse_size;
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/memsim.yaml";
const ENV_PREFIX: &str = "MEMSIM_";

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq, Eq)]
pub struct MemsimConfig {
    /// Block table limits.
    #[validate(nested)]
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Simulated heap parameters.
    #[validate(nested)]
    #[serde(default)]
    pub heap: HeapConfig,

    /// Logging parameters.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl MemsimConfig {
    /// Load configuration from the default files and environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(MemsimConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        }

        if let Ok(env) = std::env::var("MEMSIM_ENV") {
            let env_file = format!("config/{}.yaml", env);
            if Path::new(&env_file).exists() {
                figment = figment.merge(Yaml::file(env_file));
            }
        }

        Self::finish(figment)
    }

    /// Load configuration from a specific file; environment variables still apply.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let figment =
            Figment::from(Serialized::defaults(MemsimConfig::default())).merge(Yaml::file(path));
        Self::finish(figment)
    }

    /// Applies command-line overrides and re-validates.
    pub fn with_overrides(
        mut self,
        capacity: Option<usize>,
        heap_limit: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if let Some(capacity) = capacity {
            self.registry.capacity = capacity;
        }
        if let Some(limit) = heap_limit {
            self.heap.limit = limit;
        }
        self.validate()?;
        Ok(self)
    }

    fn finish(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["env"]).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn full_config_validation() {
        let config = MemsimConfig::default();
        config.validate().expect("Default config should validate");
        assert_eq!(config.registry.capacity, 100);
    }

    #[test]
    fn defaults_without_files() {
        Jail::expect_with(|_| {
            let config = MemsimConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config, MemsimConfig::default());
            Ok(())
        });
    }

    #[test]
    fn environment_override() {
        Jail::expect_with(|jail| {
            jail.set_env("MEMSIM_REGISTRY__CAPACITY", "8");
            jail.set_env("MEMSIM_HEAP__LIMIT", "2MiB");
            let config = MemsimConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.registry.capacity, 8);
            assert_eq!(config.heap.limit, 2 * 1024 * 1024);
            Ok(())
        });
    }

    #[test]
    fn layered_files() {
        Jail::expect_with(|jail| {
            std::fs::create_dir("config").map_err(|e| e.to_string())?;
            jail.create_file(
                "config/memsim.yaml",
                "registry:\n  capacity: 10\nheap:\n  limit: 1KiB\n",
            )?;
            jail.create_file("config/tiny.yaml", "registry:\n  capacity: 2\n")?;
            jail.set_env("MEMSIM_ENV", "tiny");

            let config = MemsimConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.registry.capacity, 2);
            assert_eq!(config.heap.limit, 1024);
            assert_eq!(config.telemetry.log_level, "warn");
            Ok(())
        });
    }

    #[test]
    fn invalid_file_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.yaml", "registry:\n  capacity: 0\n")?;
            let err = MemsimConfig::load_from_path("bad.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_reported() {
        let err = MemsimConfig::load_from_path("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn overrides_are_validated() {
        let config = MemsimConfig::default()
            .with_overrides(Some(3), Some(512))
            .unwrap();
        assert_eq!(config.registry.capacity, 3);
        assert_eq!(config.heap.limit, 512);

        let err = MemsimConfig::default()
            .with_overrides(Some(0), None)
            .unwrap_err();
        assert!(err.to_string().contains("registry.capacity: range"));
    }
}
