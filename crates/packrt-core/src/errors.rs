use crate::registry::ModuleId;
use thiserror::Error;

/// Errors surfaced by the loader, the export helpers and configuration loading
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Module not found: {id}")]
    UnresolvedModule { id: ModuleId },

    #[error("{message}")]
    Thrown { message: String },

    #[error("Export '{name}' is not defined")]
    MissingExport { name: String },

    #[error("Export '{name}' is not a function")]
    NotCallable { name: String },

    #[error("Circular import: {}", format_chain(.chain))]
    CircularImport { chain: Vec<ModuleId> },

    #[error("Module registered twice: {id}")]
    DuplicateModule { id: ModuleId },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    /// An error raised from inside a factory or a native function
    pub fn thrown(message: impl Into<String>) -> Self {
        RuntimeError::Thrown {
            message: message.into(),
        }
    }
}

/// Render an import chain as `a -> b -> a`
pub(crate) fn format_chain(chain: &[ModuleId]) -> String {
    chain
        .iter()
        .map(ModuleId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
