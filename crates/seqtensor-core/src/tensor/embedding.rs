//! # Embedding table
//!
//! Dense `[vocab_size, D]` lookup table indexed by word-alphabet id, for
//! fine-tuning. Rows of words the vector source knows are copied verbatim;
//! the default row and every unknown word get an independent sample from
//! Uniform(-s, s) with `s = sqrt(3 / D)`.

use candle_core::{Device, Tensor};
use oorandom::Rand32;
use seqtensor_vecdb::VectorSource;
use tracing::info;

use crate::alphabet::{Alphabet, DEFAULT_INDEX};
use crate::error::{Result, SeqTensorError};

/// Bound of the shared unknown-word vector in fixed-embedding mode.
pub const UNKNOWN_SCALE: f32 = 0.01;

/// Bound of randomly initialized embedding-table rows.
pub fn table_scale(dimension: usize) -> f32 {
    (3.0 / dimension as f32).sqrt()
}

/// `dimension` independent samples from Uniform(-scale, scale).
pub fn sample_uniform(rng: &mut Rand32, scale: f32, dimension: usize) -> Vec<f32> {
    (0..dimension)
        .map(|_| (rng.rand_float() * 2.0 - 1.0) * scale)
        .collect()
}

/// Word-id → vector table.
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    table: Tensor,
    dimension: usize,
    num_oov: usize,
}

impl EmbeddingTable {
    /// Build the table for every id in `alphabet`, default slot included.
    pub fn build<S: VectorSource + ?Sized>(
        alphabet: &Alphabet,
        source: &S,
        rng: &mut Rand32,
        device: &Device,
    ) -> Result<Self> {
        let dimension = source.dimension();
        if dimension == 0 {
            return Err(SeqTensorError::Configuration(
                "embedding dimension must be positive".into(),
            ));
        }
        let scale = table_scale(dimension);

        let mut data = Vec::with_capacity(alphabet.size() * dimension);
        data.extend(sample_uniform(rng, scale, dimension));

        let mut num_oov = 0;
        for (word, id) in alphabet.iter() {
            debug_assert_eq!(data.len(), id * dimension);
            match source.lookup(word) {
                Some(vector) if vector.len() == dimension => data.extend_from_slice(vector),
                Some(vector) => {
                    return Err(SeqTensorError::Configuration(format!(
                        "vector for {:?} has {} components, embedding dimension is {}",
                        word,
                        vector.len(),
                        dimension
                    )));
                }
                None => {
                    num_oov += 1;
                    data.extend(sample_uniform(rng, scale, dimension));
                }
            }
        }

        info!(
            "embedding table: {} rows, {} words without a pretrained vector",
            alphabet.size(),
            num_oov
        );

        let table = Tensor::from_vec(data, (alphabet.size(), dimension), device)?;
        Ok(Self {
            table,
            dimension,
            num_oov,
        })
    }

    pub fn tensor(&self) -> &Tensor {
        &self.table
    }

    pub fn into_tensor(self) -> Tensor {
        self.table
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of rows, default slot included.
    pub fn vocab_size(&self) -> usize {
        self.table.dims().first().copied().unwrap_or(0)
    }

    /// Alphabet words (default slot excluded) that received a random row.
    pub fn num_oov(&self) -> usize {
        self.num_oov
    }

    /// Row for the default id.
    pub fn default_row(&self) -> Result<Vec<f32>> {
        Ok(self.table.get(DEFAULT_INDEX)?.to_vec1::<f32>()?)
    }
}
