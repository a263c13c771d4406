use crate::infra::cli_runtime::{DEFAULT_BINARY, DEFAULT_TIMEOUT};
use crate::infra::output::OutputFormat;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "dockfacts.toml";

pub fn default_config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/root"))
        .join(".config/dockfacts")
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Runtime CLI to call (docker, podman)
    pub binary: Option<String>,
    /// Per-call timeout, e.g. "10s" or "1m"
    pub inspect_timeout: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Merges another AppConfig into self.
    /// Values from `other` overwrite values in `self` if present.
    pub fn merge(&mut self, other: AppConfig) {
        if let Some(binary) = other.runtime.binary {
            self.runtime.binary = Some(binary);
        }
        if let Some(timeout) = other.runtime.inspect_timeout {
            self.runtime.inspect_timeout = Some(timeout);
        }
        if let Some(format) = other.output.format {
            self.output.format = Some(format);
        }
    }

    /// Applies defaults and validates the merged configuration
    pub fn resolve(&self) -> Result<Settings> {
        let binary = self
            .runtime
            .binary
            .clone()
            .unwrap_or_else(|| DEFAULT_BINARY.to_string());
        if binary.trim().is_empty() {
            bail!("runtime.binary não pode ser vazio");
        }

        let inspect_timeout = match &self.runtime.inspect_timeout {
            Some(raw) => parse_duration(raw)?,
            None => DEFAULT_TIMEOUT,
        };
        if inspect_timeout.is_zero() {
            bail!("runtime.inspect_timeout deve ser maior que zero");
        }

        Ok(Settings {
            binary,
            inspect_timeout,
            format: self.output.format.unwrap_or_default(),
        })
    }
}

/// Effective settings after defaults are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub binary: String,
    pub inspect_timeout: Duration,
    pub format: OutputFormat,
}

/// Loads the global config from `config_dir`, then the one in the current directory
pub fn load_app_config(config_dir: &Path) -> Result<AppConfig> {
    load_layers(&[
        config_dir.join(DEFAULT_CONFIG_NAME),
        PathBuf::from("./").join(DEFAULT_CONFIG_NAME),
    ])
}

/// Later layers override earlier ones. Missing files are skipped.
pub fn load_layers(paths: &[PathBuf]) -> Result<AppConfig> {
    let mut app_config = AppConfig::default();

    for path in paths {
        if !path.exists() {
            continue;
        }

        debug!("carregando config de {:?}", path);
        let content = fs::read_to_string(path).with_context(|| format!("lendo {:?}", path))?;
        let layer: AppConfig =
            toml::from_str(&content).with_context(|| format!("parse de {:?}", path))?;
        app_config.merge(layer);
    }

    Ok(app_config)
}

pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if let Some(stripped) = s.strip_suffix("ms") {
        let millis: u64 = stripped.parse()?;
        Ok(Duration::from_millis(millis))
    } else if let Some(stripped) = s.strip_suffix('s') {
        let secs: u64 = stripped.parse()?;
        Ok(Duration::from_secs(secs))
    } else if let Some(stripped) = s.strip_suffix('m') {
        let mins: u64 = stripped.parse()?;
        Ok(Duration::from_secs(mins * 60))
    } else {
        bail!("Formato de duração inválido: {}", s)
    }
}
