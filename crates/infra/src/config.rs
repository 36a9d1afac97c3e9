//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use anyhow::{Context, bail};
use serde::Deserialize;

use watchstock_observability::LogFormat;
use watchstock_tracking::DhlConfig;

/// Deployment environment (`APP_ENV`).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Local,
    Testing,
}

impl Environment {
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "local" | "development" | "dev" => Ok(Environment::Local),
            "testing" | "test" => Ok(Environment::Testing),
            other => bail!("unknown APP_ENV `{other}`"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Local => "local",
            Environment::Testing => "testing",
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    /// Local development or test runs.
    pub fn is_local(self) -> bool {
        matches!(self, Environment::Local | Environment::Testing)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub log_format: LogFormat,
    pub dhl: DhlConfig,
    /// Location assigned to watches saved without one.
    pub default_location: Option<String>,
    /// Root directory of the public disk.
    pub storage_root: PathBuf,
    /// URL prefix under which the public disk is served.
    pub storage_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests, layered config).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match var("APP_ENV") {
            Some(raw) => Environment::parse(&raw)?,
            None => Environment::default(),
        };

        let log_format = match var("LOG_FORMAT") {
            Some(raw) => raw
                .parse::<LogFormat>()
                .context("invalid LOG_FORMAT")?,
            None if environment.is_local() => LogFormat::Pretty,
            None => LogFormat::Json,
        };

        Ok(Self {
            environment,
            log_format,
            dhl: DhlConfig::from_lookup(&lookup),
            default_location: var("WATCH_DEFAULT_LOCATION"),
            storage_root: var("STORAGE_PUBLIC_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("storage/app/public")),
            storage_url: var("STORAGE_PUBLIC_URL").unwrap_or_else(|| "/storage".to_string()),
        })
    }

    /// Install process-wide tracing in the configured format.
    pub fn init_tracing(&self) {
        watchstock_observability::init_with(self.log_format);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_for_local_development() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.environment, Environment::Local);
        assert!(config.environment.is_local());
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.default_location, None);
        assert_eq!(config.storage_url, "/storage");
        assert_eq!(config.dhl.api_key, None);
    }

    #[test]
    fn production_settings() {
        let config = AppConfig::from_lookup(lookup(&[
            ("APP_ENV", "production"),
            ("DHL_API_KEY", "key"),
            ("WATCH_DEFAULT_LOCATION", "DE"),
            ("STORAGE_PUBLIC_ROOT", "/srv/public"),
        ]))
        .unwrap();

        assert!(config.environment.is_production());
        assert!(!config.environment.is_local());
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.dhl.api_key.as_deref(), Some("key"));
        assert_eq!(config.default_location.as_deref(), Some("DE"));
        assert_eq!(config.storage_root, PathBuf::from("/srv/public"));
    }

    #[test]
    fn rejects_unknown_environment_and_log_format() {
        assert!(AppConfig::from_lookup(lookup(&[("APP_ENV", "moon")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("LOG_FORMAT", "xml")])).is_err());
    }
}
