//! Error types for Libros

use thiserror::Error;

use crate::cfi::CfiError;
use crate::opds::MapError;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("CFI error: {0}")]
    Cfi(#[from] CfiError),

    #[error("Feed error: {0}")]
    Feed(#[from] MapError),

    #[error("Configuration error: {0}")]
    Config(String),
}
