use thiserror::Error;

/// Structural/numeric problems are caught at construction time; invariant
/// violations and deadlocks only surface once the engine is running.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse scenario JSON: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("structural error: {0}")]
    Structural(String),

    #[error("numeric error: {0}")]
    Numeric(String),

    #[error("invariant violation: {0}")]
    Invariant(String),

    #[error("deadlock: {0}")]
    Deadlock(String),
}

pub type Result<T> = std::result::Result<T, Error>;
