pub mod doctor;
pub mod facts;
pub mod logging;

pub use facts::ReportArgs;
