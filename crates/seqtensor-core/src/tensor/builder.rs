//! # Tensor alignment
//!
//! Turns variable-length sentences into `(X, Y, mask)` tensors of one common
//! length `L`. For sentence `i` of length `n`:
//!
//! - `j < n`: X holds the producer's features, `Y = label_id - 1`, mask is 1;
//! - `j >= n`: X is zero, Y repeats `Y[i, n - 1]`, mask is 0.
//!
//! Both fine-tune and fixed-embedding modes go through [`TensorBuilder::build`];
//! they differ only in the [`FeatureProducer`].

use std::iter;

use candle_core::{Device, Tensor, WithDType};
use seqtensor_vecdb::VectorSource;

use crate::corpus::{Corpus, Sentence};
use crate::error::{Result, SeqTensorError};
use crate::tensor::features::{FeatureProducer, IdFeatures, VectorFeatures};

/// Subtracted from label ids to get zero-based training targets. Label
/// alphabets start at 1 because id 0 is the default slot.
pub const LABEL_ID_OFFSET: usize = 1;

/// Aligned tensors for one split.
#[derive(Debug, Clone)]
pub struct SplitTensors {
    /// `u32 [N, L]` word ids or `f32 [N, L, D]` features.
    pub x: Tensor,
    /// `u32 [N, L]` zero-based label ids.
    pub y: Tensor,
    /// `f32 [N, L]`, 1.0 on real tokens.
    pub mask: Tensor,
}

impl SplitTensors {
    /// Number of sentences (rows).
    pub fn num_sentences(&self) -> usize {
        self.y.dims().first().copied().unwrap_or(0)
    }
}

/// Common target length for a set of splits: the longest sentence across
/// all of them, capped at `limit`.
pub fn target_length(limit: usize, corpora: &[&Corpus]) -> usize {
    let longest = corpora.iter().map(|c| c.max_length()).max().unwrap_or(0);
    longest.min(limit)
}

/// Builds fixed-length tensors from sentences.
#[derive(Debug, Clone)]
pub struct TensorBuilder {
    max_length: usize,
    device: Device,
}

impl TensorBuilder {
    /// Builder padding every sentence to `max_length` positions, on CPU.
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            device: Device::Cpu,
        }
    }

    /// Allocate the tensors on `device`.
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Word-id tensors for fine-tuning an embedding table downstream.
    pub fn build_indexed(&self, sentences: &[Sentence]) -> Result<SplitTensors> {
        self.build(sentences, &IdFeatures)
    }

    /// Feature tensors with pretrained vectors inlined. Words missing from
    /// `source` get `unknown`; padding positions stay zero.
    pub fn build_embedded<S: VectorSource + ?Sized>(
        &self,
        sentences: &[Sentence],
        source: &S,
        unknown: &[f32],
    ) -> Result<SplitTensors> {
        let features = VectorFeatures::new(source, unknown)?;
        self.build(sentences, &features)
    }

    /// Align `sentences` using `producer` for the real-token features.
    pub fn build<F: FeatureProducer>(
        &self,
        sentences: &[Sentence],
        producer: &F,
    ) -> Result<SplitTensors> {
        let rows = sentences.len();
        let length = self.max_length;
        let width = producer.width();

        let mut x: Vec<F::Elem> = Vec::with_capacity(rows * length * width);
        let mut y: Vec<u32> = Vec::with_capacity(rows * length);
        let mut mask: Vec<f32> = Vec::with_capacity(rows * length);
        let zero = <F::Elem as WithDType>::from_f64(0.0);

        for (row, sentence) in sentences.iter().enumerate() {
            let n = sentence.len();
            if n == 0 {
                return Err(SeqTensorError::EmptySentence { row });
            }
            if n > length {
                return Err(SeqTensorError::SentenceTooLong {
                    row,
                    length: n,
                    max_length: length,
                });
            }

            for ((word, &word_id), &label_id) in sentence
                .words
                .iter()
                .zip(&sentence.word_ids)
                .zip(&sentence.label_ids)
            {
                producer.produce(word, word_id, &mut x)?;
                y.push(training_target(row, label_id)?);
            }

            let padding = length - n;
            let last_label = y[y.len() - 1];
            x.extend(iter::repeat_n(zero, padding * width));
            y.extend(iter::repeat_n(last_label, padding));
            mask.extend(iter::repeat_n(1.0f32, n));
            mask.extend(iter::repeat_n(0.0f32, padding));
        }

        debug_assert_eq!(x.len(), rows * length * width);

        Ok(SplitTensors {
            x: Tensor::from_vec(x, producer.shape(rows, length), &self.device)?,
            y: Tensor::from_vec(y, (rows, length), &self.device)?,
            mask: Tensor::from_vec(mask, (rows, length), &self.device)?,
        })
    }
}

fn training_target(row: usize, label_id: usize) -> Result<u32> {
    label_id
        .checked_sub(LABEL_ID_OFFSET)
        .and_then(|target| u32::try_from(target).ok())
        .ok_or_else(|| {
            SeqTensorError::Configuration(format!(
                "sentence {} has label id {} with no training target",
                row, label_id
            ))
        })
}
