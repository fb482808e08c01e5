use std::io;

/// All error types for the indexer pipeline.
#[derive(thiserror::Error, Debug)]
pub enum IndexerError {
    #[error("Input error: {0}")]
    Input(String),
    #[error("Index overflow: {attempted} unique vertices exceed the limit of {limit}")]
    IndexOverflow { attempted: usize, limit: usize },
    #[error("Output error: {0}")]
    Output(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IndexerError>;
