//! Command-line arguments for the `prepare` binary.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use seqtensor_core::{OovPolicy, PipelineConfig};
use seqtensor_vecdb::EmbeddingKind;

#[derive(Parser, Debug)]
#[command(name = "prepare")]
#[command(about = "Convert CoNLL-style corpora into padded training tensors")]
#[command(version)]
pub struct Args {
    /// JSON pipeline configuration; flags below override its fields
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Training split
    #[arg(long)]
    pub train: Option<PathBuf>,

    /// Development split
    #[arg(long)]
    pub dev: Option<PathBuf>,

    /// Test split
    #[arg(long)]
    pub test: Option<PathBuf>,

    /// Column of the word, starting from 0 [default: 1]
    #[arg(long)]
    pub word_column: Option<usize>,

    /// Column of the label, starting from 0 [default: 4]
    #[arg(long)]
    pub label_column: Option<usize>,

    /// Name of the label alphabet, such as pos or ner [default: pos]
    #[arg(long)]
    pub label_name: Option<String>,

    /// Handling of unseen dev/test words: random or embedding [default: embedding]
    #[arg(long)]
    pub oov: Option<OovPolicy>,

    /// Emit word ids and an embedding table instead of inlined vectors
    /// (`--fine-tune false` overrides the config file)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub fine_tune: Option<bool>,

    /// Embedding format: word2vec or senna [default: word2vec]
    #[arg(long)]
    pub embedding: Option<EmbeddingKind>,

    /// Pretrained embedding file
    #[arg(long)]
    pub embedding_path: Option<PathBuf>,

    /// Read word2vec vectors in the text layout instead of binary
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub embedding_text: Option<bool>,

    /// Longest sentence kept [default: 120]
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Seed for random vectors
    #[arg(long)]
    pub seed: Option<u64>,

    /// Reject dev/test labels not seen in training
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub close_label_alphabet: Option<bool>,

    /// Write all tensors to this safetensors file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the word and label alphabets as JSON into this directory
    #[arg(long)]
    pub alphabet_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Merge the optional config file with command-line overrides.
    pub fn to_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => match (&self.train, &self.dev, &self.test) {
                (Some(train), Some(dev), Some(test)) => PipelineConfig::new(train, dev, test),
                _ => bail!("--train, --dev and --test are required without --config"),
            },
        };

        if let Some(train) = &self.train {
            config.train_path = train.clone();
        }
        if let Some(dev) = &self.dev {
            config.dev_path = dev.clone();
        }
        if let Some(test) = &self.test {
            config.test_path = test.clone();
        }
        if let Some(column) = self.word_column {
            config.word_column = column;
        }
        if let Some(column) = self.label_column {
            config.label_column = column;
        }
        if let Some(name) = &self.label_name {
            config.label_name = name.clone();
        }
        if let Some(oov) = self.oov {
            config.oov = oov;
        }
        if let Some(fine_tune) = self.fine_tune {
            config.fine_tune = fine_tune;
        }
        if let Some(kind) = self.embedding {
            config.embedding = kind;
        }
        if let Some(path) = &self.embedding_path {
            config.embedding_path = path.clone();
        }
        if let Some(text) = self.embedding_text {
            config.embedding_binary = !text;
        }
        if let Some(max_length) = self.max_length {
            config.max_length = max_length;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(close) = self.close_label_alphabet {
            config.close_label_alphabet = close;
        }

        Ok(config)
    }
}
