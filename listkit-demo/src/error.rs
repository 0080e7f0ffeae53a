use std::path::PathBuf;

use listkit::error::{DropdownError, ListError};

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("Could not read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    List(#[from] ListError),

    #[error(transparent)]
    Dropdown(#[from] DropdownError),

    #[error("Invalid location: {0}")]
    Location(#[from] url::ParseError),

    #[error("Logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    #[error("No row with ID '{0}' on this page")]
    UnknownRow(String),
}

impl DemoError {
    pub fn read_config(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadConfig {
            path: path.into(),
            source,
        }
    }
}
