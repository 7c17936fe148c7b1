//! # seqtensor Prep
//!
//! Command-line front end over the seqtensor pipeline: reads the three
//! splits, builds the tensors, and optionally writes them to a safetensors
//! file alongside JSON alphabets.

pub mod cli;
pub mod export;
pub mod prepare;

pub use cli::Args;
pub use prepare::run_preparation;
