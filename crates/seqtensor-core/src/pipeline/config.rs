//! # Pipeline configuration
//!
//! Everything a run needs: split paths, column layout, vocabulary policy and
//! embedding source. Deserializable from JSON; fields other than the three
//! split paths have defaults.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use seqtensor_vecdb::EmbeddingKind;
use serde::{Deserialize, Serialize};

use crate::corpus::MAX_LENGTH;
use crate::error::{Result, SeqTensorError};

/// How dev/test words unseen in training are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OovPolicy {
    /// Close the word alphabet after training; unseen words share the
    /// default id (and its random embedding).
    Random,
    /// Keep the word alphabet open so dev/test words get their own ids and
    /// pretrained vectors.
    #[default]
    Embedding,
}

impl fmt::Display for OovPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OovPolicy::Random => write!(f, "random"),
            OovPolicy::Embedding => write!(f, "embedding"),
        }
    }
}

impl FromStr for OovPolicy {
    type Err = SeqTensorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(OovPolicy::Random),
            "embedding" => Ok(OovPolicy::Embedding),
            _ => Err(SeqTensorError::Configuration(format!(
                "oov should choose from [random, embedding], got {:?}",
                s
            ))),
        }
    }
}

fn default_word_column() -> usize {
    1
}

fn default_label_column() -> usize {
    4
}

fn default_label_name() -> String {
    "pos".to_string()
}

fn default_embedding_path() -> PathBuf {
    PathBuf::from("data/word2vec/GoogleNews-vectors-negative300.bin")
}

fn default_true() -> bool {
    true
}

fn default_max_length() -> usize {
    MAX_LENGTH
}

/// Configuration for a [`Pipeline`](crate::pipeline::Pipeline) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub train_path: PathBuf,
    pub dev_path: PathBuf,
    pub test_path: PathBuf,
    /// 0-based column holding the word.
    #[serde(default = "default_word_column")]
    pub word_column: usize,
    /// 0-based column holding the label.
    #[serde(default = "default_label_column")]
    pub label_column: usize,
    /// Name of the label alphabet, such as `pos` or `ner`.
    #[serde(default = "default_label_name")]
    pub label_name: String,
    #[serde(default)]
    pub oov: OovPolicy,
    /// Emit word ids plus an embedding table instead of inlined vectors.
    #[serde(default)]
    pub fine_tune: bool,
    #[serde(default)]
    pub embedding: EmbeddingKind,
    #[serde(default = "default_embedding_path")]
    pub embedding_path: PathBuf,
    /// word2vec binary (true) or text (false) layout.
    #[serde(default = "default_true")]
    pub embedding_binary: bool,
    /// Longest sentence kept when reading.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Seed for random vectors. Unseeded runs use the clock.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Close the label alphabet after training so dev/test labels must have
    /// been seen.
    #[serde(default)]
    pub close_label_alphabet: bool,
}

impl PipelineConfig {
    /// Configuration with default settings for the given splits.
    pub fn new(
        train_path: impl Into<PathBuf>,
        dev_path: impl Into<PathBuf>,
        test_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            train_path: train_path.into(),
            dev_path: dev_path.into(),
            test_path: test_path.into(),
            word_column: default_word_column(),
            label_column: default_label_column(),
            label_name: default_label_name(),
            oov: OovPolicy::default(),
            fine_tune: false,
            embedding: EmbeddingKind::default(),
            embedding_path: default_embedding_path(),
            embedding_binary: true,
            max_length: MAX_LENGTH,
            seed: None,
            close_label_alphabet: false,
        }
    }

    /// Read a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SeqTensorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|e| {
            SeqTensorError::Configuration(format!("failed to parse {:?}: {}", path, e))
        })
    }

    /// Set the word and label columns.
    pub fn with_columns(mut self, word_column: usize, label_column: usize) -> Self {
        self.word_column = word_column;
        self.label_column = label_column;
        self
    }

    pub fn with_label_name(mut self, label_name: impl Into<String>) -> Self {
        self.label_name = label_name.into();
        self
    }

    pub fn with_oov(mut self, oov: OovPolicy) -> Self {
        self.oov = oov;
        self
    }

    pub fn with_fine_tune(mut self, fine_tune: bool) -> Self {
        self.fine_tune = fine_tune;
        self
    }

    /// Set the embedding source format and location.
    pub fn with_embedding(mut self, embedding: EmbeddingKind, path: impl Into<PathBuf>) -> Self {
        self.embedding = embedding;
        self.embedding_path = path.into();
        self
    }

    pub fn with_embedding_binary(mut self, binary: bool) -> Self {
        self.embedding_binary = binary;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_close_label_alphabet(mut self, close: bool) -> Self {
        self.close_label_alphabet = close;
        self
    }

    /// Whether the word alphabet is closed before reading dev/test.
    pub fn closes_word_alphabet(&self) -> bool {
        self.oov == OovPolicy::Random && !self.fine_tune
    }

    /// Reject configurations that cannot run.
    pub fn validate(&self) -> Result<()> {
        self.embedding.ensure_supported()?;
        if self.max_length == 0 {
            return Err(SeqTensorError::Configuration(
                "max_length must be positive".into(),
            ));
        }
        Ok(())
    }
}
