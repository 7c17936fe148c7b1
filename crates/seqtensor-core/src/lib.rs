//! # seqtensor Core
//!
//! Converts CoNLL-style column corpora into fixed-shape tensors for
//! sequence-labeling training: vocabulary alphabets, corpus reading, tensor
//! alignment with masks, and pretrained-embedding injection.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::io::Cursor;
//! use seqtensor_core::{Alphabet, CorpusReader, TensorBuilder};
//!
//! let mut words = Alphabet::new("word");
//! let mut labels = Alphabet::new("pos");
//! let corpus = CorpusReader::new(0, 1)
//!     .read_from(Cursor::new("John NNP\nruns VBZ\n\nMary NNP\n"), "inline", &mut words, &mut labels)
//!     .unwrap();
//!
//! let tensors = TensorBuilder::new(2).build_indexed(&corpus.sentences).unwrap();
//! assert_eq!(tensors.y.to_vec2::<u32>().unwrap(), vec![vec![0, 1], vec![0, 0]]);
//! ```
pub mod alphabet;
pub mod corpus;
pub mod error;
pub mod pipeline;
pub mod tensor;

// Re-export primary API
pub use alphabet::{Alphabet, DEFAULT_INDEX};
pub use corpus::{Corpus, CorpusReader, Sentence, MAX_LENGTH};
pub use error::{Result, SeqTensorError};
pub use pipeline::{Dataset, OovPolicy, Pipeline, PipelineConfig, Splits};
pub use tensor::{
    target_length, EmbeddingTable, FeatureProducer, IdFeatures, SplitTensors, TensorBuilder,
    VectorFeatures, LABEL_ID_OFFSET,
};
