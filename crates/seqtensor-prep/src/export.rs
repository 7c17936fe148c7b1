//! Persisting a [`Dataset`] for a training process to pick up.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use candle_core::Tensor;
use seqtensor_core::Dataset;

/// All tensors of a dataset keyed `x_train`, `y_train`, `mask_train`, ... and
/// `embedding_table` when present.
pub fn tensor_map(dataset: &Dataset) -> HashMap<String, Tensor> {
    let mut tensors = HashMap::new();
    for (split, tensor) in [
        ("train", &dataset.train),
        ("dev", &dataset.dev),
        ("test", &dataset.test),
    ] {
        tensors.insert(format!("x_{}", split), tensor.x.clone());
        tensors.insert(format!("y_{}", split), tensor.y.clone());
        tensors.insert(format!("mask_{}", split), tensor.mask.clone());
    }
    if let Some(table) = &dataset.embedding_table {
        tensors.insert("embedding_table".to_string(), table.clone());
    }
    tensors
}

/// Write every tensor of `dataset` to a safetensors file.
pub fn save_tensors(dataset: &Dataset, path: &Path) -> Result<()> {
    let tensors = tensor_map(dataset);
    candle_core::safetensors::save(&tensors, path)
        .with_context(|| format!("failed to write tensors to {:?}", path))?;
    Ok(())
}

/// Write both alphabets as `<name>.json` into `dir`.
pub fn save_alphabets(dataset: &Dataset, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {:?}", dir))?;
    dataset.word_alphabet.save(dir)?;
    dataset.label_alphabet.save(dir)?;
    Ok(())
}
