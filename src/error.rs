use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No writable storage location: {0}")]
    StorageUnavailable(String),

    #[error("Corrupt data in {path}: {message}")]
    CorruptData { path: PathBuf, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Nothing to generate from: {0}")]
    EmptySource(String),

    #[error("Generator unavailable: {0}")]
    GeneratorUnavailable(String),

    #[error("Malformed generated content: {0}")]
    MalformedArtifact(String),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),
}

impl StudyError {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::CorruptData {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<reqwest::Error> for StudyError {
    fn from(e: reqwest::Error) -> Self {
        Self::GeneratorUnavailable(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StudyError>;
