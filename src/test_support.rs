use crate::domain::{Container, ContainerDetails, ContainerRuntime, Mount};
use crate::error::{FactsError, Result};
use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct MockContainer {
    pub container: Container,
    pub mounts: Vec<Mount>,
    pub env: Vec<String>,
}

/// In-memory runtime with scripted failures
#[derive(Debug)]
pub struct MockRuntime {
    containers: RwLock<Vec<MockContainer>>,
    calls: RwLock<Vec<String>>,
    failing_inspections: RwLock<HashSet<String>>,
    fail_inventory: RwLock<Option<String>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self {
            containers: RwLock::new(Vec::new()),
            calls: RwLock::new(Vec::new()),
            failing_inspections: RwLock::new(HashSet::new()),
            fail_inventory: RwLock::new(None),
        }
    }

    /// Adds a running container. Its id is `id-<name>`.
    pub fn add_container(&self, name: &str, image: &str, mounts: Vec<Mount>) {
        self.containers.write().unwrap().push(MockContainer {
            container: Container::new(Self::id_for(name), image, name),
            mounts,
            env: Vec::new(),
        });
    }

    pub fn set_env(&self, name: &str, env: &[&str]) {
        if let Some(c) = self
            .containers
            .write()
            .unwrap()
            .iter_mut()
            .find(|c| c.container.name == name)
        {
            c.env = env.iter().map(|s| s.to_string()).collect();
        }
    }

    pub fn fail_inspect(&self, name: &str) {
        self.failing_inspections
            .write()
            .unwrap()
            .insert(Self::id_for(name));
    }

    pub fn fail_inventory(&self, message: &str) {
        *self.fail_inventory.write().unwrap() = Some(message.to_string());
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn id_for(name: &str) -> String {
        format!("id-{name}")
    }

    fn record_call(&self, call: &str) {
        self.calls.write().unwrap().push(call.to_string());
    }
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerRuntime for MockRuntime {
    fn list_running_containers(&self) -> Result<Vec<Container>> {
        self.record_call("list");

        if let Some(ref message) = *self.fail_inventory.read().unwrap() {
            return Err(FactsError::inventory(message.clone()));
        }

        Ok(self
            .containers
            .read()
            .unwrap()
            .iter()
            .map(|c| c.container.clone())
            .collect())
    }

    fn inspect_container(&self, id: &str) -> Result<ContainerDetails> {
        self.record_call(&format!("inspect:{id}"));

        if self.failing_inspections.read().unwrap().contains(id) {
            return Err(FactsError::inspection(id, "Mock failure on inspect"));
        }

        self.containers
            .read()
            .unwrap()
            .iter()
            .find(|c| c.container.id == id)
            .map(|c| ContainerDetails {
                id: c.container.id.clone(),
                name: c.container.name.clone(),
                image: c.container.image.clone(),
                mounts: c.mounts.clone(),
                env: c.env.clone(),
            })
            .ok_or_else(|| FactsError::inspection(id, format!("No such object: {id}")))
    }

    fn is_available(&self) -> bool {
        self.record_call("is_available");
        true
    }
}
