//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("failed to generate search query: {0}")]
    Translate(String),

    #[error("search error: {0}")]
    Search(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
