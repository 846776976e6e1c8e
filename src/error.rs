use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The model could not be reached or answered with an unusable payload.
    /// Never substituted by a default classification.
    #[error("generation unavailable: {0}")]
    LanguageModel(String),
    #[error("export error: {0}")]
    Export(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
