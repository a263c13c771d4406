use serde::{Deserialize, Serialize};

/// Storage footprint of one container inside a service group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerStorage {
    pub name: String,
    pub bind_volumes: Vec<String>,
    pub named_volumes: Vec<String>,
    /// Set when the container could not be inspected; volume lists are empty then
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspection_error: Option<String>,
}

impl ContainerStorage {
    pub fn new(name: impl Into<String>, bind_volumes: Vec<String>, named_volumes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            bind_volumes,
            named_volumes,
            inspection_error: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bind_volumes: Vec::new(),
            named_volumes: Vec::new(),
            inspection_error: Some(error.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.inspection_error.is_some()
    }
}

/// Containers inferred to belong to the same application stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub title: String,
    pub containers: Vec<ContainerStorage>,
}

impl Service {
    pub fn container_names(&self) -> Vec<&str> {
        self.containers.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Top-level document for the service grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ServicesReport {
    pub services: Vec<Service>,
}
