use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while collecting container facts
#[derive(Error, Debug)]
pub enum FactsError {
    /// Running containers could not be enumerated. Fatal for the whole run.
    #[error("falha ao listar containers em execução: {message}")]
    Inventory { message: String },

    /// A single container could not be inspected. Recovered per container.
    #[error("falha ao inspecionar container {id}: {message}")]
    Inspection { id: String, message: String },

    /// The report could not be written to the requested destination.
    #[error("falha ao escrever em {path:?}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("falha ao serializar relatório: {message}")]
    Render { message: String },
}

impl FactsError {
    pub fn inventory(message: impl Into<String>) -> Self {
        Self::Inventory {
            message: message.into(),
        }
    }

    pub fn inspection(id: &str, message: impl Into<String>) -> Self {
        Self::Inspection {
            id: id.to_string(),
            message: message.into(),
        }
    }

    /// Whether the error only affects one container and the run can go on
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Inspection { .. })
    }
}

pub type Result<T> = std::result::Result<T, FactsError>;
