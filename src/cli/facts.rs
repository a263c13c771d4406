use crate::domain::{ContainerRuntime, DatabasesReport, ServicesReport};
use crate::infra::config::Settings;
use crate::infra::{OutputFormat, deliver};
use crate::services::{DatabaseInspector, ServiceGrouper};
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Args, Debug, Default, Clone)]
pub struct ReportArgs {
    /// Arquivo de saída (sem ele o relatório vai para stdout)
    #[arg(short, long)]
    pub output: Option<String>,
    /// Formato do relatório (padrão: config ou yaml)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl ReportArgs {
    fn format(&self, settings: &Settings) -> OutputFormat {
        self.format.unwrap_or(settings.format)
    }
}

pub fn services(
    runtime: Arc<dyn ContainerRuntime>,
    settings: &Settings,
    args: &ReportArgs,
) -> Result<ServicesReport> {
    let services = ServiceGrouper::new(runtime)
        .collect()
        .context("agrupando serviços")?;

    let failed = services
        .iter()
        .flat_map(|s| &s.containers)
        .filter(|c| c.is_failed())
        .count();
    if failed > 0 {
        warn!("  {failed} container(s) não puderam ser inspecionados");
    }

    emit(ServicesReport { services }, args.format(settings), args.output.as_deref())
}

pub fn databases(
    runtime: Arc<dyn ContainerRuntime>,
    settings: &Settings,
    args: &ReportArgs,
) -> Result<DatabasesReport> {
    let databases = DatabaseInspector::new(runtime)
        .collect()
        .context("coletando bancos de dados")?;

    emit(DatabasesReport { databases }, args.format(settings), args.output.as_deref())
}

/// Prints the report when it isn't written to a file, or when writing failed.
fn emit<T: Serialize>(report: T, format: OutputFormat, output: Option<&str>) -> Result<T> {
    let delivery = deliver(report, format, output)?;

    if delivery.path.is_none() {
        print!("{}", delivery.rendered);
        return Ok(delivery.data);
    }

    if let Some(err) = delivery.write_error {
        error!(" {err}");
        print!("{}", delivery.rendered);
        return Err(err.into());
    }

    Ok(delivery.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mount;
    use crate::infra::config::AppConfig;
    use crate::test_support::MockRuntime;
    use tempfile::TempDir;

    #[test]
    fn services_report_is_written_to_file() {
        let mock = Arc::new(MockRuntime::new());
        mock.add_container("blog-web", "ghost", vec![Mount::volume("blog_content")]);
        mock.add_container("blog-db", "mysql:8", vec![]);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("services.json");
        let args = ReportArgs {
            output: path.to_str().map(String::from),
            format: Some(OutputFormat::Json),
        };
        let settings = AppConfig::default().resolve().unwrap();

        let report = services(mock, &settings, &args).unwrap();
        assert_eq!(report.services.len(), 1);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["services"][0]["title"], "blog");
        assert_eq!(
            written["services"][0]["containers"][0]["named_volumes"][0],
            "blog_content"
        );
    }

    #[test]
    fn write_failure_is_an_error() {
        let mock = Arc::new(MockRuntime::new());
        mock.add_container("pg", "postgres:16", vec![]);

        let dir = TempDir::new().unwrap();
        let args = ReportArgs {
            output: dir.path().join("nope/out.yml").to_str().map(String::from),
            format: None,
        };
        let settings = AppConfig::default().resolve().unwrap();

        let err = databases(mock, &settings, &args).unwrap_err();
        assert!(err.to_string().contains("falha ao escrever"));
    }

    #[test]
    fn inventory_failure_aborts() {
        let mock = Arc::new(MockRuntime::new());
        mock.fail_inventory("Cannot connect to the Docker daemon");
        let settings = AppConfig::default().resolve().unwrap();

        let err = services(mock, &settings, &ReportArgs::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Cannot connect to the Docker daemon"));
    }
}
