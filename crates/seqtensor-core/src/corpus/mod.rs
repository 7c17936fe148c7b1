pub mod reader;
pub mod sentence;

pub use reader::{CorpusReader, MAX_LENGTH};
pub use sentence::{Corpus, Sentence};
