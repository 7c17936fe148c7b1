//! Embedding source identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VecDbError;

/// Format of a pretrained embedding source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingKind {
    /// word2vec vectors, binary or text.
    #[default]
    #[serde(alias = "word2Vec")]
    Word2Vec,
    /// SENNA vectors (word list plus embedding matrix). No loader yet.
    Senna,
}

impl EmbeddingKind {
    /// Whether a loader exists for this format.
    pub fn is_supported(&self) -> bool {
        matches!(self, EmbeddingKind::Word2Vec)
    }

    /// Fail with [`VecDbError::UnsupportedFormat`] if no loader exists.
    pub fn ensure_supported(&self) -> Result<(), VecDbError> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(VecDbError::UnsupportedFormat(self.to_string()))
        }
    }
}

impl fmt::Display for EmbeddingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingKind::Word2Vec => write!(f, "word2vec"),
            EmbeddingKind::Senna => write!(f, "senna"),
        }
    }
}

impl FromStr for EmbeddingKind {
    type Err = VecDbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "word2vec" => Ok(EmbeddingKind::Word2Vec),
            "senna" => Ok(EmbeddingKind::Senna),
            _ => Err(VecDbError::UnknownFormat(s.to_string())),
        }
    }
}
