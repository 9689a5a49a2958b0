//! Error type shared by the library.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Only raised when grades are validated strictly; the lenient policy
    /// applies unknown grades as a null delta instead.
    #[error("invalid grade: {0:?} (expected again, hard, good or easy)")]
    InvalidGrade(String),

    #[error("unknown deck: {0}")]
    UnknownDeck(String),

    #[error("unknown card: {0}")]
    UnknownCard(String),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("unsupported backup version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
