use crate::error::{FactsError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

pub fn render<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yml::to_string(data).map_err(|e| FactsError::Render {
            message: e.to_string(),
        }),
        OutputFormat::Json => serde_json::to_string_pretty(data)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| FactsError::Render {
                message: e.to_string(),
            }),
    }
}

/// Result of handing a report to its destination.
///
/// The data and its rendering are kept even when writing fails, so callers
/// can still show what was computed.
#[derive(Debug)]
pub struct Delivery<T> {
    pub data: T,
    pub rendered: String,
    /// File the report was written to, if one was requested
    pub path: Option<PathBuf>,
    pub write_error: Option<FactsError>,
}

impl<T> Delivery<T> {
    pub fn written(&self) -> bool {
        self.path.is_some() && self.write_error.is_none()
    }
}

/// Renders `data` and writes it to `output` when given.
///
/// `output` may contain `~` and environment variables.
pub fn deliver<T: Serialize>(
    data: T,
    format: OutputFormat,
    output: Option<&str>,
) -> Result<Delivery<T>> {
    let rendered = render(&data, format)?;

    let Some(raw) = output else {
        return Ok(Delivery {
            data,
            rendered,
            path: None,
            write_error: None,
        });
    };

    let (path, write_error) = match shellexpand::full(raw) {
        Ok(expanded) => {
            let path = PathBuf::from(expanded.as_ref());
            let err = fs::write(&path, &rendered)
                .err()
                .map(|source| FactsError::OutputWrite {
                    path: path.clone(),
                    source,
                });
            (path, err)
        }
        Err(e) => {
            let path = PathBuf::from(raw);
            let err = FactsError::OutputWrite {
                path: path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, e.to_string()),
            };
            (path, Some(err))
        }
    };

    if write_error.is_none() {
        info!("Relatório escrito em {:?}", path);
    }

    Ok(Delivery {
        data,
        rendered,
        path: Some(path),
        write_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContainerStorage, Service, ServicesReport};
    use tempfile::TempDir;

    fn sample() -> ServicesReport {
        ServicesReport {
            services: vec![Service {
                title: "app".into(),
                containers: vec![ContainerStorage::new(
                    "app-web",
                    vec!["/srv/www".into()],
                    vec!["app_data".into()],
                )],
            }],
        }
    }

    #[test]
    fn renders_yaml_in_field_order() {
        let yaml = render(&sample(), OutputFormat::Yaml).unwrap();
        let title = yaml.find("title").unwrap();
        let containers = yaml.find("containers").unwrap();
        assert!(yaml.starts_with("services:"));
        assert!(title < containers);
        assert!(yaml.contains("/srv/www"));
    }

    #[test]
    fn renders_json() {
        let json = render(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["services"][0]["containers"][0]["name"], "app-web");
    }

    #[test]
    fn without_output_nothing_is_written() {
        let delivery = deliver(sample(), OutputFormat::Yaml, None).unwrap();
        assert!(delivery.path.is_none());
        assert!(!delivery.written());
        assert!(!delivery.rendered.is_empty());
    }

    #[test]
    fn writes_to_requested_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("services.yml");

        let delivery = deliver(sample(), OutputFormat::Yaml, path.to_str()).unwrap();
        assert!(delivery.written());

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, delivery.rendered);
        let parsed: ServicesReport = serde_yml::from_str(&content).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn write_failure_keeps_the_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("out.yml");

        let delivery = deliver(sample(), OutputFormat::Yaml, path.to_str()).unwrap();
        assert!(!delivery.written());
        assert!(matches!(
            delivery.write_error,
            Some(FactsError::OutputWrite { .. })
        ));
        assert_eq!(delivery.data, sample());
        assert!(delivery.rendered.contains("app-web"));
    }
}
