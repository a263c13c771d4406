use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dockfacts::cli::{self as commands, ReportArgs};
use dockfacts::infra::CliRuntime;
use dockfacts::infra::config::{Settings, default_config_dir, load_app_config, parse_duration};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "dockfacts",
    about = "Coleta fatos sobre os containers em execução (serviços, volumes e bancos)",
    long_about = "Coleta fatos sobre os containers em execução (serviços, volumes e bancos).\n\n\
                  O resultado é uma fotografia do momento: containers podem subir ou cair \
                  entre a listagem e cada inspeção."
)]
struct Cli {
    /// Diretório de configuração (default: ~/.config/dockfacts)
    #[arg(long, env = "DOCKFACTS_CONFIG_DIR", default_value_os_t = default_config_dir())]
    config_dir: PathBuf,

    /// Binário do runtime (docker, podman)
    #[arg(long, env = "DOCKFACTS_RUNTIME")]
    runtime: Option<String>,

    /// Tempo limite por chamada ao runtime (ex: 10s, 1m)
    #[arg(long)]
    timeout: Option<String>,

    /// Logs detalhados
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Agrupa containers em serviços com seus volumes
    Services(ReportArgs),
    /// Lista bancos de dados em execução e suas credenciais
    Databases(ReportArgs),
    /// Verifica o runtime e a configuração
    Doctor,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut app_config = load_app_config(&self.config_dir)?;
        if let Some(binary) = &self.runtime {
            app_config.runtime.binary = Some(binary.clone());
        }
        if let Some(timeout) = &self.timeout {
            parse_duration(timeout).with_context(|| format!("--timeout {timeout}"))?;
            app_config.runtime.inspect_timeout = Some(timeout.clone());
        }
        app_config.resolve()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::logging::init(cli.verbose);

    let settings = cli.settings()?;
    let runtime = Arc::new(CliRuntime::new(&settings.binary, settings.inspect_timeout));

    match &cli.command {
        Commands::Services(args) => commands::facts::services(runtime, &settings, args).map(|_| ()),
        Commands::Databases(args) => commands::facts::databases(runtime, &settings, args).map(|_| ()),
        Commands::Doctor => commands::doctor::run(runtime.as_ref(), &settings, &cli.config_dir),
    }
}
