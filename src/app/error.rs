use std::io;
use thiserror::Error;

use super::commands::CommandError;
use crate::engine::{ConfigError, RunError};

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Worker task error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Not every command succeeded")]
    NotAllSucceeded,

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

impl From<RunError<CommandError, io::Error>> for AppError {
    fn from(error: RunError<CommandError, io::Error>) -> Self {
        match error {
            RunError::Operation(error) => AppError::Command(error),
            RunError::Traversal(error) => AppError::Io(error),
        }
    }
}
