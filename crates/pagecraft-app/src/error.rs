//! Application errors.

use pagecraft_core::{DocumentError, StorageError, TemplateError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("Invalid script: {0}")]
    Script(#[source] serde_json::Error),
    #[error("Failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("No element with id {0}")]
    UnknownElement(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> AppError {
        let path = path.into();
        move |source| AppError::Io { path, source }
    }
}
