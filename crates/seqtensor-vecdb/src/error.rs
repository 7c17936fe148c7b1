use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or querying a word-vector store.
#[derive(Debug, Error)]
pub enum VecDbError {
    /// The vector file could not be opened or read.
    #[error("failed to read vectors from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from an already opened stream failed.
    #[error("failed to read vector data: {0}")]
    Read(#[from] std::io::Error),

    /// The `<count> <dimension>` header line is missing or malformed.
    #[error("invalid word2vec header: {0:?}")]
    InvalidHeader(String),

    /// A vector does not have the store's dimensionality.
    #[error("vector for {word:?} has {found} components, expected {expected}")]
    DimensionMismatch {
        word: String,
        expected: usize,
        found: usize,
    },

    /// The input ended in the middle of a record.
    #[error("vector data truncated after {read} of {expected} entries")]
    Truncated { read: usize, expected: usize },

    /// A binary-format word is not valid UTF-8.
    #[error("entry {entry}: word is not valid UTF-8")]
    InvalidUtf8 { entry: usize },

    /// A component of a text-format vector is not a number.
    #[error("line {line}: invalid vector component {value:?}")]
    InvalidNumber { line: usize, value: String },

    /// The embedding format is recognized but has no loader.
    #[error("embedding format `{0}` is not yet supported")]
    UnsupportedFormat(String),

    /// The embedding identifier is not recognized at all.
    #[error("unknown embedding `{0}`, expected one of [word2vec, senna]")]
    UnknownFormat(String),
}

/// Result type alias for vector-store operations.
pub type Result<T> = std::result::Result<T, VecDbError>;
