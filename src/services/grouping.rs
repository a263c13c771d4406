use crate::domain::{Container, ContainerRuntime, ContainerStorage, Mount, MountKind, Service};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Splits a mount list into `(bind_volumes, named_volumes)`, keeping inspection order.
pub fn classify_mounts(mounts: &[Mount]) -> (Vec<String>, Vec<String>) {
    let mut bind_volumes = Vec::new();
    let mut named_volumes = Vec::new();

    for mount in mounts {
        match mount.kind {
            MountKind::Bind => bind_volumes.push(mount.source_or_name.clone()),
            MountKind::Volume => named_volumes.push(mount.source_or_name.clone()),
            MountKind::Other(_) => {}
        }
    }

    (bind_volumes, named_volumes)
}

/// Prefix of `name` up to the first run of `_` or `-`.
pub fn service_key(name: &str) -> &str {
    name.split(['_', '-']).next().unwrap_or(name)
}

/// Groups running containers into services by shared name prefix
pub struct ServiceGrouper {
    runtime: Arc<dyn ContainerRuntime>,
}

impl ServiceGrouper {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }

    /// Lists running containers and groups them
    pub fn collect(&self) -> crate::error::Result<Vec<Service>> {
        let containers = self.runtime.list_running_containers()?;
        info!(" {} container(s) em execução", containers.len());
        Ok(self.group(&containers))
    }

    /// Partitions `containers` into services.
    ///
    /// Every container lands in exactly one service: the first one, in
    /// inventory order, whose key is a prefix of its name. Containers that
    /// fail inspection are still listed, with empty volumes and an error.
    pub fn group(&self, containers: &[Container]) -> Vec<Service> {
        let mut processed: HashSet<&str> = HashSet::new();
        let mut services = Vec::new();

        for seed in containers {
            if processed.contains(seed.name.as_str()) {
                continue;
            }

            let key = service_key(&seed.name);
            debug!("Novo serviço '{key}' a partir de {}", seed.name);

            let mut members = Vec::new();
            for candidate in containers.iter().filter(|c| c.name.starts_with(key)) {
                if !processed.insert(candidate.name.as_str()) {
                    continue;
                }
                members.push(self.storage_for(candidate));
            }

            services.push(Service {
                title: key.to_string(),
                containers: members,
            });
        }

        info!(" {} serviço(s) identificados", services.len());
        services
    }

    fn storage_for(&self, container: &Container) -> ContainerStorage {
        match self.runtime.inspect_container(&container.id) {
            Ok(details) => {
                let (bind_volumes, named_volumes) = classify_mounts(&details.mounts);
                ContainerStorage::new(&container.name, bind_volumes, named_volumes)
            }
            Err(e) => {
                warn!("  {}: {}", container.name, e);
                ContainerStorage::failed(&container.name, e.to_string())
            }
        }
    }
}
