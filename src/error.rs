use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("vulnerability scanner error: {0}")]
    Scanner(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error("sync trigger error: {0}")]
    Trigger(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
