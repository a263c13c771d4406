use crate::domain::{Container, ContainerDetails, ContainerRuntime, Mount, MountKind};
use crate::error::{FactsError, Result};
use anyhow::{Context, anyhow};
use serde::Deserialize;
use std::ffi::OsStr;
use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_BINARY: &str = "docker";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const PS_FORMAT: &str = "{{.ID}} {{.Image}} {{.Names}}";
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Container runtime backed by the `docker` (or `podman`) command line
#[derive(Debug, Clone)]
pub struct CliRuntime {
    binary: String,
    timeout: Duration,
}

impl CliRuntime {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn run<I, S>(&self, args: I, context: &str) -> anyhow::Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args.into_iter().map(|item| item.as_ref().to_os_string()));
        debug!("executando {} ({context})", self.binary);
        run_with_timeout(cmd, self.timeout).with_context(|| context.to_string())
    }
}

impl Default for CliRuntime {
    fn default() -> Self {
        Self::new(DEFAULT_BINARY, DEFAULT_TIMEOUT)
    }
}

impl ContainerRuntime for CliRuntime {
    fn list_running_containers(&self) -> Result<Vec<Container>> {
        let output = self
            .run(
                ["ps", "--no-trunc", "--format", PS_FORMAT],
                "listando containers em execução",
            )
            .map_err(|e| FactsError::inventory(format!("{e:#}")))?;

        if !output.status.success() {
            return Err(FactsError::inventory(output.failure_message(&self.binary)));
        }

        parse_ps_output(&output.stdout)
    }

    fn inspect_container(&self, id: &str) -> Result<ContainerDetails> {
        let output = self
            .run(["inspect", id], &format!("inspecionando container {id}"))
            .map_err(|e| FactsError::inspection(id, format!("{e:#}")))?;

        if !output.status.success() {
            return Err(FactsError::inspection(
                id,
                output.failure_message(&self.binary),
            ));
        }

        parse_inspect_output(id, &output.stdout)
    }

    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

#[derive(Debug)]
struct CommandOutput {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

impl CommandOutput {
    fn failure_message(&self, binary: &str) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            format!("{binary} retornou status {:?}", self.status)
        } else {
            format!("{binary} retornou status {:?}: {stderr}", self.status)
        }
    }
}

/// Runs `cmd` to completion, killing it once `timeout` expires.
fn run_with_timeout(mut cmd: Command, timeout: Duration) -> anyhow::Result<CommandOutput> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context("iniciando processo")?;

    // Pipes are drained on their own threads so a chatty child never blocks on a full buffer.
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait().context("aguardando processo")? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(anyhow!("tempo limite de {:?} excedido", timeout));
        }
        thread::sleep(POLL_INTERVAL);
    };

    Ok(CommandOutput {
        status,
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Parses `ps --format '{{.ID}} {{.Image}} {{.Names}}'` output
pub fn parse_ps_output(stdout: &str) -> Result<Vec<Container>> {
    let mut containers = Vec::new();

    for (idx, line) in stdout.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.splitn(3, char::is_whitespace);
        match (fields.next(), fields.next(), fields.next()) {
            (Some(id), Some(image), Some(name)) if !name.trim().is_empty() => {
                containers.push(Container::new(id, image, name.trim()));
            }
            _ => {
                return Err(FactsError::inventory(format!(
                    "linha {} malformada na saída de ps: {line:?}",
                    idx + 1
                )));
            }
        }
    }

    Ok(containers)
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectDocument {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    config: Option<InspectConfig>,
    #[serde(default)]
    mounts: Option<Vec<InspectMount>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectConfig {
    #[serde(default)]
    image: String,
    #[serde(default)]
    env: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectMount {
    #[serde(rename = "Type", default)]
    kind: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    name: Option<String>,
}

impl From<InspectMount> for Mount {
    fn from(raw: InspectMount) -> Self {
        let kind = MountKind::parse(&raw.kind);
        let source_or_name = match kind {
            MountKind::Volume => raw.name.unwrap_or_default(),
            _ => raw.source,
        };
        Mount {
            kind,
            source_or_name,
        }
    }
}

/// Parses the JSON array printed by `inspect <id>`
pub fn parse_inspect_output(id: &str, stdout: &str) -> Result<ContainerDetails> {
    let docs: Vec<InspectDocument> = serde_json::from_str(stdout)
        .map_err(|e| FactsError::inspection(id, format!("JSON de inspect inválido: {e}")))?;

    let doc = docs
        .into_iter()
        .next()
        .ok_or_else(|| FactsError::inspection(id, "inspect não retornou nenhum objeto"))?;

    let (image, env) = match doc.config {
        Some(config) => (config.image, config.env.unwrap_or_default()),
        None => (String::new(), Vec::new()),
    };

    Ok(ContainerDetails {
        id: doc.id,
        name: doc.name.trim_start_matches('/').to_string(),
        image,
        mounts: doc
            .mounts
            .unwrap_or_default()
            .into_iter()
            .map(Mount::from)
            .collect(),
        env,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ps_lines() {
        let out = "abc123 postgres:16 myapp-db-1\ndef456 nginx:alpine myapp-web-1\n\n";
        let containers = parse_ps_output(out).unwrap();
        assert_eq!(containers.len(), 2);
        assert_eq!(containers[0], Container::new("abc123", "postgres:16", "myapp-db-1"));
        assert_eq!(containers[1].name, "myapp-web-1");
    }

    #[test]
    fn empty_ps_output_is_empty_inventory() {
        assert!(parse_ps_output("").unwrap().is_empty());
        assert!(parse_ps_output("\n  \n").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_ps_line() {
        let err = parse_ps_output("abc123 postgres:16\n").unwrap_err();
        assert!(matches!(err, FactsError::Inventory { .. }));
        assert!(err.to_string().contains("linha 1"));
    }

    #[test]
    fn parses_inspect_mounts_and_env() {
        let json = r#"[{
            "Id": "abc123",
            "Name": "/myapp-db-1",
            "Config": {
                "Image": "postgres:16",
                "Env": ["POSTGRES_USER=admin", "PATH=/usr/bin"]
            },
            "Mounts": [
                {"Type": "bind", "Source": "/data/x", "Destination": "/x"},
                {"Type": "volume", "Name": "cache_vol", "Source": "/var/lib/docker/volumes/cache_vol/_data"},
                {"Type": "tmpfs", "Source": "", "Destination": "/tmp"}
            ]
        }]"#;

        let details = parse_inspect_output("abc123", json).unwrap();
        assert_eq!(details.name, "myapp-db-1");
        assert_eq!(details.image, "postgres:16");
        assert_eq!(details.env.len(), 2);
        assert_eq!(
            details.mounts,
            vec![
                Mount::bind("/data/x"),
                Mount::volume("cache_vol"),
                Mount {
                    kind: MountKind::Other("tmpfs".into()),
                    source_or_name: String::new(),
                },
            ]
        );
    }

    #[test]
    fn inspect_without_mounts_or_env() {
        let json = r#"[{"Id": "abc", "Name": "/cache", "Config": {"Image": "redis", "Env": null}, "Mounts": null}]"#;
        let details = parse_inspect_output("abc", json).unwrap();
        assert!(details.mounts.is_empty());
        assert!(details.env.is_empty());
    }

    #[test]
    fn empty_inspect_array_is_an_error() {
        let err = parse_inspect_output("gone", "[]").unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn missing_binary_is_reported_as_inventory_error() {
        let runtime = CliRuntime::new("dockfacts-no-such-binary", Duration::from_secs(1));
        assert!(!runtime.is_available());
        let err = runtime.list_running_containers().unwrap_err();
        assert!(matches!(err, FactsError::Inventory { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn kills_commands_that_exceed_the_timeout() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        let started = Instant::now();
        let err = run_with_timeout(cmd, Duration::from_millis(100)).unwrap_err();
        assert!(err.to_string().contains("tempo limite"));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
