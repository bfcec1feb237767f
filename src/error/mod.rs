//! Error handling module

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Device source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Store read failed: {0}")]
    StoreReadError(String),

    #[error("Store write failed: {0}")]
    StoreWriteError(String),
}
