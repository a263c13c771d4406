use serde::{Deserialize, Serialize};

/// A running container as reported by the inventory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    pub image: String,
    pub name: String,
}

impl Container {
    pub fn new(id: impl Into<String>, image: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image: image.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountKind {
    /// Host path mounted into the container
    Bind,
    /// Runtime-managed volume identified by name
    Volume,
    /// tmpfs, npipe, cluster and anything else we don't report
    Other(String),
}

impl MountKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "bind" => Self::Bind,
            "volume" => Self::Volume,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub kind: MountKind,
    /// Host path for bind mounts, volume name for named volumes
    pub source_or_name: String,
}

impl Mount {
    pub fn bind(source: impl Into<String>) -> Self {
        Self {
            kind: MountKind::Bind,
            source_or_name: source.into(),
        }
    }

    pub fn volume(name: impl Into<String>) -> Self {
        Self {
            kind: MountKind::Volume,
            source_or_name: name.into(),
        }
    }
}

/// Detailed metadata for one container, as returned by inspection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContainerDetails {
    pub id: String,
    pub name: String,
    pub image: String,
    pub mounts: Vec<Mount>,
    /// Raw `KEY=VALUE` entries
    pub env: Vec<String>,
}
