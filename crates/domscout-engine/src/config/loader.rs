use super::schema::DomscoutConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid URL for {field}: {source}")]
    InvalidUrl {
        field: &'static str,
        source: url::ParseError,
    },
    #[error("Invalid demo action '{0}' (expected edit or delete)")]
    InvalidAction(String),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./domscout.yaml
    /// 2. ~/.domscout/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<DomscoutConfig, ConfigError> {
        let local_config = PathBuf::from("./domscout.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".domscout").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        debug!("no config file found, using defaults");
        Ok(DomscoutConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<DomscoutConfig, ConfigError> {
        debug!(path = %path.display(), "loading config");
        let content = tokio::fs::read_to_string(path).await?;
        let config: DomscoutConfig = serde_yaml::from_str(&content)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Reject URLs and demo actions the pipelines could not use.
    pub fn validate(config: &DomscoutConfig) -> Result<(), ConfigError> {
        check_url("mapping.url", &config.mapping.url)?;
        check_url("table.url", &config.table.url)?;
        if let Some(webdriver_url) = &config.driver.webdriver_url {
            check_url("driver.webdriver_url", webdriver_url)?;
        }
        for click in &config.table.demo_clicks {
            click
                .action
                .parse::<domscout_common::protocol::ActionKind>()
                .map_err(|_| ConfigError::InvalidAction(click.action.clone()))?;
        }
        Ok(())
    }
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidUrl { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_defaults_when_sections_missing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mapping:\n  pacing_ms: 0").unwrap();

        let config = ConfigLoader::load_from(file.path()).await.unwrap();
        assert_eq!(config.mapping.pacing_ms, 0);
        assert_eq!(config.mapping.ready_timeout_secs, 15);
        assert_eq!(config.mapping.demo_query, "smartphone");
        assert_eq!(config.table.ready_timeout_secs, 10);
        assert_eq!(config.table.demo_clicks.len(), 2);
        assert_eq!(config.driver.port, 9515);
        assert!(config.driver.webdriver_url.is_none());
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "table:\n  url: not a url").unwrap();

        let err = ConfigLoader::load_from(file.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { field: "table.url", .. }));
    }

    #[tokio::test]
    async fn test_invalid_demo_action_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "table:\n  demo_clicks:\n    - row: 1\n      action: archive").unwrap();

        let err = ConfigLoader::load_from(file.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAction(a) if a == "archive"));
    }

    #[tokio::test]
    async fn test_malformed_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "driver: [unclosed").unwrap();

        let err = ConfigLoader::load_from(file.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
