pub mod cli_runtime;
pub mod config;
pub mod output;

pub use cli_runtime::CliRuntime;
pub use output::{Delivery, OutputFormat, deliver, render};
