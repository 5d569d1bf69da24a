// logretain-config - runtime configuration for template reconciliation
//
// Sources, highest priority first:
// 1. Environment variables (LOGRETAIN_* prefix)
// 2. Config file path from LOGRETAIN_CONFIG
// 3. Default config files (./logretain.toml, ./.logretain.toml)
// 4. Built-in defaults

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

mod sources;

pub use sources::{load_config, load_from_file_path, load_or_default};

/// Resolved runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub reconcile: ReconcileSettings,

    #[serde(default)]
    pub target: TargetSettings,

    #[serde(default)]
    pub log: LogSettings,
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.target.service.trim().is_empty() {
            bail!("target.service must be set (config file or LOGRETAIN_SERVICE)");
        }
        Ok(())
    }
}

/// Reconciliation options. `retain_logs` is the single recognized knob.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileSettings {
    #[serde(default)]
    pub retain_logs: bool,
}

/// Identity of the deployment target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSettings {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default)]
    pub service: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            service: String::new(),
            stage: None,
            region: None,
        }
    }
}

fn default_provider() -> String {
    "aws".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unknown log format '{}': expected 'text' or 'json'", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_expectations() {
        let config = RuntimeConfig::default();
        assert!(!config.reconcile.retain_logs);
        assert_eq!(config.target.provider, "aws");
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, LogFormat::Text);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: RuntimeConfig = toml::from_str(
            r#"
            [reconcile]
            retain_logs = true

            [target]
            service = "my-service"
            stage = "prod"
            "#,
        )
        .unwrap();

        assert!(config.reconcile.retain_logs);
        assert_eq!(config.target.service, "my-service");
        assert_eq!(config.target.stage.as_deref(), Some("prod"));
        assert_eq!(config.target.provider, "aws");
        assert_eq!(config.log.format, LogFormat::Text);
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_missing_service() {
        let config = RuntimeConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("yaml".parse::<LogFormat>().is_err());
    }
}
