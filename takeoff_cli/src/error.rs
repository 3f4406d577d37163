use std::path::PathBuf;
use takeoff_core::TakeoffError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Takeoff(#[from] TakeoffError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse config file '{path}': {source}", path = path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl CliError {
    /// One-line message for the terminal, led by the error's category.
    pub fn summary(&self) -> String {
        match self {
            CliError::Takeoff(inner) => format!("{}: {}", inner.category(), inner),
            other => format!("Error: {}", other),
        }
    }
}
