use std::path::PathBuf;

use seqtensor_vecdb::VecDbError;
use thiserror::Error;

/// Errors that can occur while turning a corpus into tensors.
#[derive(Debug, Error)]
pub enum SeqTensorError {
    /// A non-blank line has fewer columns than the word/label columns require.
    #[error("{source_name}:{line}: expected at least {expected} columns, found {found}")]
    MalformedLine {
        /// File (or stream) the line came from.
        source_name: String,
        /// 1-based line number.
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A label was not seen during training and the label alphabet is closed.
    #[error("{source_name}:{line}: label {label:?} is not in the closed label alphabet")]
    UnknownLabel {
        source_name: String,
        line: usize,
        label: String,
    },

    /// A corpus or output file could not be read or written.
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or unsupported configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A sentence is longer than the tensor's target length.
    #[error("sentence {row} has length {length}, exceeding the target length {max_length}")]
    SentenceTooLong {
        row: usize,
        length: usize,
        max_length: usize,
    },

    /// A zero-length sentence reached the tensor builder.
    #[error("sentence {row} is empty")]
    EmptySentence { row: usize },

    /// Loading the pretrained vectors failed.
    #[error("vector store error: {0}")]
    VectorStore(#[from] VecDbError),

    /// Alphabet or configuration JSON could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Candle tensor error.
    #[error("tensor error: {0}")]
    Candle(#[from] candle_core::Error),
}

impl SeqTensorError {
    /// Whether the error comes from malformed corpus input.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            SeqTensorError::MalformedLine { .. } | SeqTensorError::UnknownLabel { .. }
        )
    }

    /// Whether the error comes from the run configuration, including
    /// unsupported or inconsistent embedding sources.
    pub fn is_configuration_error(&self) -> bool {
        match self {
            SeqTensorError::Configuration(_) => true,
            SeqTensorError::VectorStore(err) => matches!(
                err,
                VecDbError::UnsupportedFormat(_)
                    | VecDbError::UnknownFormat(_)
                    | VecDbError::DimensionMismatch { .. }
            ),
            _ => false,
        }
    }
}

/// Result type alias for seqtensor operations.
pub type Result<T> = std::result::Result<T, SeqTensorError>;
