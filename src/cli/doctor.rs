use crate::domain::ContainerRuntime;
use crate::infra::config::{DEFAULT_CONFIG_NAME, Settings};
use anyhow::{Result, bail};
use std::path::Path;
use tracing::{info, warn};

/// Checks that the runtime CLI is reachable and shows the effective configuration
pub fn run(runtime: &dyn ContainerRuntime, settings: &Settings, config_dir: &Path) -> Result<()> {
    info!(" Checando dependências e configuração...");

    let config_file = config_dir.join(DEFAULT_CONFIG_NAME);
    if config_file.exists() {
        info!(" Config: {:?}", config_file);
    } else {
        info!("  Sem {:?}, usando padrões", config_file);
    }

    info!(
        "   runtime = {}, timeout = {:?}, formato = {:?}",
        settings.binary, settings.inspect_timeout, settings.format
    );

    if !runtime.is_available() {
        warn!("  {} não encontrado no PATH", settings.binary);
        bail!("runtime '{}' indisponível", settings.binary);
    }

    info!(" {} disponível", settings.binary);
    Ok(())
}
