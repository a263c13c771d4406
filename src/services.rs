mod databases;
mod grouping;

pub use databases::{DatabaseInspector, credentials_for, parse_env};
pub use grouping::{ServiceGrouper, classify_mounts, service_key};
