//! Driver-level errors — failures that keep the compiler from running at
//! all, as distinct from the accumulated diagnostics the compiler produces
//! for a malformed *program*.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("input file not found: {0}")]
    NoInputFile(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
