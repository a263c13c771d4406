use crate::domain::{Container, ContainerRuntime, DatabaseFact, DatabaseKind, ImageRef};
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Parses `KEY=VALUE` entries, splitting on the first `=`.
pub fn parse_env(env: &[String]) -> HashMap<String, String> {
    env.iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (entry.clone(), String::new()),
        })
        .collect()
}

/// Looks up the admin user and password for `kind` in `env`
pub fn credentials_for(
    kind: DatabaseKind,
    env: &HashMap<String, String>,
) -> (Option<String>, Option<String>) {
    match kind.credential_vars() {
        Some((user_var, password_var)) => {
            (env.get(user_var).cloned(), env.get(password_var).cloned())
        }
        None => (None, None),
    }
}

/// Finds running database containers and their credentials
pub struct DatabaseInspector {
    runtime: Arc<dyn ContainerRuntime>,
}

impl DatabaseInspector {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }

    pub fn collect(&self) -> Result<Vec<DatabaseFact>> {
        let containers = self.runtime.list_running_containers()?;
        if containers.is_empty() {
            info!(" Nenhum container em execução encontrado");
        }
        Ok(self.classify(&containers))
    }

    /// Keeps inventory order. Containers with unrecognised images are skipped.
    pub fn classify(&self, containers: &[Container]) -> Vec<DatabaseFact> {
        let mut facts = Vec::new();

        for container in containers {
            let kind = DatabaseKind::from_image(&container.image);
            if !kind.is_known() {
                debug!("{} ({}) não é um banco conhecido", container.name, container.image);
                continue;
            }

            let env = match self.runtime.inspect_container(&container.id) {
                Ok(details) => parse_env(&details.env),
                Err(e) => {
                    warn!("  Sem credenciais para {}: {}", container.name, e);
                    HashMap::new()
                }
            };
            let (master_user, master_password) = credentials_for(kind, &env);

            facts.push(DatabaseFact {
                name: container.name.clone(),
                kind,
                image: ImageRef {
                    name: container.image.clone(),
                    id: container.id.clone(),
                },
                master_user,
                master_password,
            });
        }

        info!(" {} banco(s) encontrados", facts.len());
        facts
    }
}
