//! # seqtensor VecDB
//!
//! Pretrained word-vector sources for tensor construction. Exposes the
//! [`VectorSource`] lookup interface, the in-memory [`WordVectors`] store and
//! loaders for the word2vec binary and text formats.

pub mod error;
pub mod kind;
pub mod store;
pub mod word2vec;

pub use error::{Result, VecDbError};
pub use kind::EmbeddingKind;
pub use store::{VectorSource, WordVectors};
pub use word2vec::{load_vectors, read_word2vec_binary, read_word2vec_text, MAX_DIMENSION};
