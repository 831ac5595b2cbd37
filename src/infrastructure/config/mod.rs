use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::domain::error::{AppError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "homeworth.toml";
pub const ENV_PREFIX: &str = "HOMEWORTH_";

/// Remote prediction service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Batch dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Upper bound on concurrently in-flight valuation requests.
    pub max_concurrency: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self { max_concurrency: 8 }
    }
}

/// Process-wide configuration, passed explicitly to the components that
/// need it. Loaded from defaults, an optional TOML file, and `HOMEWORTH_*`
/// environment variables, in that precedence order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub batch: BatchSettings,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to load settings: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.service.base_url).map_err(|e| {
            AppError::ConfigError(format!(
                "Invalid service base URL '{}': {}",
                self.service.base_url, e
            ))
        })?;

        if self.batch.max_concurrency == 0 {
            return Err(AppError::ConfigError(
                "batch.max_concurrency must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.service.base_url, "http://localhost:5000");
        assert_eq!(settings.service.timeout_secs, 30);
        assert_eq!(settings.batch.max_concurrency, 8);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_file_then_env_precedence() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                [service]
                base_url = "http://file-host:5000"

                [batch]
                max_concurrency = 4
                "#,
            )?;
            jail.set_env("HOMEWORTH_SERVICE__BASE_URL", "http://env-host:9000");

            let settings =
                Settings::load().map_err(|e| figment::Error::from(e.to_string()))?;
            assert_eq!(settings.service.base_url, "http://env-host:9000");
            assert_eq!(settings.batch.max_concurrency, 4);
            assert_eq!(settings.service.timeout_secs, 30);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let settings = Settings {
            service: ServiceSettings {
                base_url: "not a url".to_string(),
                timeout_secs: 30,
            },
            batch: BatchSettings::default(),
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let settings = Settings {
            service: ServiceSettings::default(),
            batch: BatchSettings { max_concurrency: 0 },
        };
        assert!(settings.validate().is_err());
    }
}
