//! Fact source error types.

use thiserror::Error;

/// Errors raised while reading a single fact source.
///
/// These never escape [`FactProvider::capture`](crate::FactProvider::capture):
/// the provider logs them and substitutes the source's fallback value.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The backing source does not exist on this host.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The source produced a value that could not be interpreted.
    #[error("malformed reading from {source_name}: {detail}")]
    Malformed { source_name: String, detail: String },

    /// An I/O error occurred while reading the source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
