//! Error types for the Gridcalc command-line host

use gridcalc_core::SheetError;
use thiserror::Error;

/// Errors that can occur while running commands
#[derive(Error, Debug)]
pub enum GridcalcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing argument for '{0}'")]
    MissingArgument(&'static str),

    #[error("Invalid cell reference: {0}")]
    InvalidCell(String),

    #[error("Config error in {path}: {message}")]
    Config { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, GridcalcError>;
