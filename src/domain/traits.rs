use super::{Container, ContainerDetails};
use crate::error::Result;
use std::fmt::Debug;

/// Read-only view of a container runtime
pub trait ContainerRuntime: Send + Sync + Debug {
    /// List running containers in the order the runtime reports them
    fn list_running_containers(&self) -> Result<Vec<Container>>;

    /// Inspect a single container by id
    fn inspect_container(&self, id: &str) -> Result<ContainerDetails>;

    /// Check if the runtime binary is available
    fn is_available(&self) -> bool;
}
