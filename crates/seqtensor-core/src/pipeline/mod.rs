pub mod config;
pub mod runner;

pub use config::{OovPolicy, PipelineConfig};
pub use runner::{Dataset, Pipeline, Splits};
