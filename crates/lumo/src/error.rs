//! CLI error types.

use lumo_config::ConfigError;
use lumo_diagrams::ViewError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    View(#[from] ViewError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Render(String),
}
