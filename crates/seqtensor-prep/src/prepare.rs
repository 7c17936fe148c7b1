//! End-to-end run of the `prepare` binary.

use anyhow::{Context, Result};
use seqtensor_core::{Dataset, Pipeline, SplitTensors};
use tracing::info;

use crate::cli::Args;
use crate::export::{save_alphabets, save_tensors};

fn describe(name: &str, split: &SplitTensors) {
    println!(
        "{:<6} X {:?}  Y {:?}  mask {:?}",
        name,
        split.x.dims(),
        split.y.dims(),
        split.mask.dims()
    );
}

/// Print tensor shapes and vocabulary sizes.
pub fn report(dataset: &Dataset) {
    describe("train", &dataset.train);
    describe("dev", &dataset.dev);
    describe("test", &dataset.test);
    if let Some(table) = &dataset.embedding_table {
        println!("embedding table {:?}", table.dims());
    }
    println!(
        "max length {}, {} words, {} labels",
        dataset.max_length,
        dataset.word_alphabet.size() - 1,
        dataset.label_size
    );
}

pub fn run_preparation(args: &Args) -> Result<Dataset> {
    let config = args.to_config()?;
    let dataset = Pipeline::new(config)
        .run()
        .context("failed to build tensors")?;

    report(&dataset);

    if let Some(path) = &args.output {
        save_tensors(&dataset, path)?;
        info!("Tensors saved to {:?}", path);
    }
    if let Some(dir) = &args.alphabet_dir {
        save_alphabets(&dataset, dir)?;
        info!("Alphabets saved to {:?}", dir);
    }

    Ok(dataset)
}
