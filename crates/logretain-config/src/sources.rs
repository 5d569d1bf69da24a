// Configuration source loading.
//
// Priority order:
// 1. Environment variables (LOGRETAIN_* prefix)
// 2. Config file path from LOGRETAIN_CONFIG
// 3. Default config files (./logretain.toml, ./.logretain.toml)
// 4. Built-in defaults

use crate::RuntimeConfig;
use anyhow::{bail, Context, Result};
use std::env;
use std::path::Path;
use tracing::debug;

const ENV_PREFIX: &str = "LOGRETAIN_";

const DEFAULT_CONFIG_FILES: &[&str] = &["./logretain.toml", "./.logretain.toml"];

/// Abstraction over environment-variable lookups so override layering can be
/// tested without mutating process state.
trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }
}

/// Load and validate configuration from the standard sources.
pub fn load_config() -> Result<RuntimeConfig> {
    let mut config = load_from_file()?.unwrap_or_default();
    apply_env_overrides(&mut config, &StdEnvSource)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration without failing validation, for callers that apply
/// their own overrides first (the CLI) and validate afterwards.
pub fn load_or_default() -> Result<RuntimeConfig> {
    let mut config = load_from_file()?.unwrap_or_default();
    apply_env_overrides(&mut config, &StdEnvSource)?;
    Ok(config)
}

/// Load configuration from a specific file path (for the CLI --config flag).
/// Environment overrides still apply on top; validation is left to the
/// caller so command-line overrides can land first.
pub fn load_from_file_path(path: impl AsRef<Path>) -> Result<RuntimeConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let mut config: RuntimeConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    apply_env_overrides(&mut config, &StdEnvSource)?;
    Ok(config)
}

fn load_from_file() -> Result<Option<RuntimeConfig>> {
    if let Ok(path) = env::var("LOGRETAIN_CONFIG") {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: RuntimeConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        debug!(%path, "loaded config from LOGRETAIN_CONFIG");
        return Ok(Some(config));
    }

    for path in DEFAULT_CONFIG_FILES {
        if Path::new(path).exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            let config: RuntimeConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path))?;
            debug!(%path, "loaded config from default location");
            return Ok(Some(config));
        }
    }

    Ok(None)
}

/// Apply environment overrides (highest priority) on top of file content.
fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    if let Some(value) = env.get("RETAIN_LOGS") {
        config.reconcile.retain_logs = parse_bool("RETAIN_LOGS", &value)?;
    }
    if let Some(value) = env.get("SERVICE") {
        config.target.service = value;
    }
    if let Some(value) = env.get("STAGE") {
        config.target.stage = Some(value);
    }
    if let Some(value) = env.get("PROVIDER") {
        config.target.provider = value;
    }
    if let Some(value) = env.get("REGION") {
        config.target.region = Some(value);
    }
    if let Some(value) = env.get("LOG_LEVEL") {
        config.log.level = value;
    }
    if let Some(value) = env.get("LOG_FORMAT") {
        config.log.format = value.parse()?;
    }
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("invalid boolean for {}{}: '{}'", ENV_PREFIX, key, other),
    }
}
