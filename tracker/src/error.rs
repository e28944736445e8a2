use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("failed to read route file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid route definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("route is empty")]
    EmptyRoute,
}
