//! Error types for the panel engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tuning parse error: {0}")]
    Tuning(#[from] toml::de::Error),
}
