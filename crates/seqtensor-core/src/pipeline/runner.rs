//! # Pipeline
//!
//! Orchestrates one run: build alphabets from the training split, optionally
//! close them, read dev and test, pick the common length, then build the
//! tensors for all three splits in the configured mode.

use std::time::{SystemTime, UNIX_EPOCH};

use candle_core::{Device, Tensor};
use oorandom::Rand32;
use seqtensor_vecdb::{load_vectors, VectorSource};
use tracing::info;

use crate::alphabet::Alphabet;
use crate::corpus::{Corpus, CorpusReader};
use crate::error::{Result, SeqTensorError};
use crate::pipeline::config::PipelineConfig;
use crate::tensor::{
    sample_uniform, target_length, EmbeddingTable, SplitTensors, TensorBuilder, UNKNOWN_SCALE,
};

/// The three splits after reading, with the alphabets that indexed them.
#[derive(Debug, Clone)]
pub struct Splits {
    pub train: Corpus,
    pub dev: Corpus,
    pub test: Corpus,
    pub word_alphabet: Alphabet,
    pub label_alphabet: Alphabet,
}

impl Splits {
    /// Common tensor length: longest sentence across splits, capped at `limit`.
    pub fn target_length(&self, limit: usize) -> usize {
        target_length(limit, &[&self.train, &self.dev, &self.test])
    }
}

/// Output of a run.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub train: SplitTensors,
    pub dev: SplitTensors,
    pub test: SplitTensors,
    /// `[word alphabet size, D]` table in fine-tune mode, `None` otherwise.
    pub embedding_table: Option<Tensor>,
    /// Number of distinct labels, default slot excluded.
    pub label_size: usize,
    /// Length every sentence was padded to.
    pub max_length: usize,
    pub word_alphabet: Alphabet,
    pub label_alphabet: Alphabet,
}

/// Corpus-to-tensor pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    device: Device,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            device: Device::Cpu,
        }
    }

    /// Allocate output tensors on `device`.
    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run end to end, loading the configured embedding source once.
    pub fn run(&self) -> Result<Dataset> {
        self.config.validate()?;
        let splits = self.read_splits()?;
        let vectors = load_vectors(
            self.config.embedding,
            &self.config.embedding_path,
            self.config.embedding_binary,
        )?;
        self.build(splits, &vectors)
    }

    /// Run end to end against an already loaded vector source.
    pub fn run_with_source<S: VectorSource + ?Sized>(&self, source: &S) -> Result<Dataset> {
        self.config.validate()?;
        let splits = self.read_splits()?;
        self.build(splits, source)
    }

    /// Read train, then dev and test, applying the alphabet closure policy
    /// in between.
    pub fn read_splits(&self) -> Result<Splits> {
        let config = &self.config;
        let reader = CorpusReader::new(config.word_column, config.label_column)
            .with_max_length(config.max_length);

        let mut word_alphabet = Alphabet::new("word");
        let mut label_alphabet = Alphabet::new(config.label_name.as_str());

        info!("Reading data from training set...");
        let train = reader.read(&config.train_path, &mut word_alphabet, &mut label_alphabet)?;

        if config.closes_word_alphabet() {
            info!("Close word alphabet.");
            word_alphabet.close();
        }
        if config.close_label_alphabet {
            info!("Close label alphabet.");
            label_alphabet.close();
        }

        info!("Reading data from dev set...");
        let dev = reader.read(&config.dev_path, &mut word_alphabet, &mut label_alphabet)?;

        info!("Reading data from test set...");
        let test = reader.read(&config.test_path, &mut word_alphabet, &mut label_alphabet)?;

        info!("word alphabet size: {}", word_alphabet.size() - 1);
        info!("label alphabet size: {}", label_alphabet.size() - 1);

        Ok(Splits {
            train,
            dev,
            test,
            word_alphabet,
            label_alphabet,
        })
    }

    /// Build tensors for all three splits from already read corpora.
    pub fn build<S: VectorSource + ?Sized>(&self, splits: Splits, source: &S) -> Result<Dataset> {
        let max_length = splits.target_length(self.config.max_length);
        info!("Maximum length of training set is {}", splits.train.max_length());
        info!("Maximum length of dev set is {}", splits.dev.max_length());
        info!("Maximum length of test set is {}", splits.test.max_length());
        info!("Maximum length used for training is {}", max_length);

        let dimension = source.dimension();
        if dimension == 0 {
            return Err(SeqTensorError::Configuration(
                "embedding dimension must be positive".into(),
            ));
        }
        info!("Dimension of embedding is {}", dimension);

        let builder = TensorBuilder::new(max_length).with_device(self.device.clone());
        let mut rng = Rand32::new(self.seed());

        let (train, dev, test, embedding_table) = if self.config.fine_tune {
            info!("Generating data with fine tuning...");
            let table =
                EmbeddingTable::build(&splits.word_alphabet, source, &mut rng, &self.device)?;
            (
                builder.build_indexed(&splits.train.sentences)?,
                builder.build_indexed(&splits.dev.sentences)?,
                builder.build_indexed(&splits.test.sentences)?,
                Some(table.into_tensor()),
            )
        } else {
            info!("Generating data without fine tuning...");
            let unknown = sample_uniform(&mut rng, UNKNOWN_SCALE, dimension);
            (
                builder.build_embedded(&splits.train.sentences, source, &unknown)?,
                builder.build_embedded(&splits.dev.sentences, source, &unknown)?,
                builder.build_embedded(&splits.test.sentences, source, &unknown)?,
                None,
            )
        };

        Ok(Dataset {
            train,
            dev,
            test,
            embedding_table,
            label_size: splits.label_alphabet.size() - 1,
            max_length,
            word_alphabet: splits.word_alphabet,
            label_alphabet: splits.label_alphabet,
        })
    }

    fn seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }
}
