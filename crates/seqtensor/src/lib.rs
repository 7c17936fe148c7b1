//! # seqtensor
//!
//! Turns CoNLL-style column corpora into padded, masked tensors for
//! sequence-labeling training, with optional pretrained word vectors.
//!
//! ```no_run
//! use seqtensor::{OovPolicy, Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::new("data/train.conll", "data/dev.conll", "data/test.conll")
//!     .with_columns(0, 3)
//!     .with_label_name("ner")
//!     .with_oov(OovPolicy::Random);
//! let dataset = Pipeline::new(config).run()?;
//! println!("{} labels, length {}", dataset.label_size, dataset.max_length);
//! # Ok::<(), seqtensor::SeqTensorError>(())
//! ```

pub use seqtensor_core::*;
pub use seqtensor_vecdb::{
    load_vectors, read_word2vec_binary, read_word2vec_text, EmbeddingKind, VecDbError,
    VectorSource, WordVectors,
};

/// Vector-store crate, for items not re-exported at the top level.
pub use seqtensor_vecdb as vecdb;
