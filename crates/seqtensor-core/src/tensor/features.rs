//! # Feature producers
//!
//! What the tensor builder writes for each real token. [`IdFeatures`] emits
//! the word's alphabet id (fine-tune mode, X is `[N, L]`); [`VectorFeatures`]
//! emits the pretrained vector inline (fixed-embedding mode, X is
//! `[N, L, D]`). Padding and masking are shared and live in the builder.

use candle_core::{Shape, WithDType};
use seqtensor_vecdb::VectorSource;

use crate::error::{Result, SeqTensorError};

/// Produces the feature values for a single token.
pub trait FeatureProducer {
    /// Element type of the feature tensor.
    type Elem: WithDType;

    /// Number of values written per token.
    fn width(&self) -> usize;

    /// Shape of the feature tensor for `rows` sentences of `length` positions.
    fn shape(&self, rows: usize, length: usize) -> Shape;

    /// Append exactly [`width`](Self::width) values for `word` to `out`.
    fn produce(&self, word: &str, word_id: usize, out: &mut Vec<Self::Elem>) -> Result<()>;
}

/// Word-id features for fine-tuning.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdFeatures;

impl FeatureProducer for IdFeatures {
    type Elem = u32;

    fn width(&self) -> usize {
        1
    }

    fn shape(&self, rows: usize, length: usize) -> Shape {
        Shape::from((rows, length))
    }

    fn produce(&self, _word: &str, word_id: usize, out: &mut Vec<u32>) -> Result<()> {
        let id = u32::try_from(word_id).map_err(|_| {
            SeqTensorError::Configuration(format!("word id {} does not fit in u32", word_id))
        })?;
        out.push(id);
        Ok(())
    }
}

/// Pretrained-vector features with a shared fallback for unknown words.
pub struct VectorFeatures<'a, S: VectorSource + ?Sized> {
    source: &'a S,
    unknown: &'a [f32],
}

impl<'a, S: VectorSource + ?Sized> VectorFeatures<'a, S> {
    /// `unknown` is written for every word `source` has no vector for.
    pub fn new(source: &'a S, unknown: &'a [f32]) -> Result<Self> {
        if unknown.len() != source.dimension() {
            return Err(SeqTensorError::Configuration(format!(
                "unknown vector has {} components, embedding dimension is {}",
                unknown.len(),
                source.dimension()
            )));
        }
        Ok(Self { source, unknown })
    }
}

impl<S: VectorSource + ?Sized> FeatureProducer for VectorFeatures<'_, S> {
    type Elem = f32;

    fn width(&self) -> usize {
        self.source.dimension()
    }

    fn shape(&self, rows: usize, length: usize) -> Shape {
        Shape::from((rows, length, self.width()))
    }

    fn produce(&self, word: &str, _word_id: usize, out: &mut Vec<f32>) -> Result<()> {
        let vector = self.source.lookup(word).unwrap_or(self.unknown);
        if vector.len() != self.width() {
            return Err(SeqTensorError::Configuration(format!(
                "vector for {:?} has {} components, embedding dimension is {}",
                word,
                vector.len(),
                self.width()
            )));
        }
        out.extend_from_slice(vector);
        Ok(())
    }
}
