pub mod cli;
pub mod domain;
pub mod error;
pub mod infra;
pub mod services;

// Make test_support available for integration tests
pub mod test_support;

pub use domain::{
    Container, ContainerRuntime, ContainerStorage, DatabaseFact, DatabaseKind, Mount, MountKind,
    Service,
};
pub use error::FactsError;
pub use infra::CliRuntime;
pub use services::{DatabaseInspector, ServiceGrouper};
