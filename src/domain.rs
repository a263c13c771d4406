mod container;
pub mod database;
mod service;
pub mod traits;

pub use container::{Container, ContainerDetails, Mount, MountKind};
pub use database::{DatabaseFact, DatabaseKind, DatabasesReport, ImageRef};
pub use service::{ContainerStorage, Service, ServicesReport};
pub use traits::ContainerRuntime;
