pub mod builder;
pub mod embedding;
pub mod features;

pub use builder::{target_length, SplitTensors, TensorBuilder, LABEL_ID_OFFSET};
pub use embedding::{sample_uniform, table_scale, EmbeddingTable, UNKNOWN_SCALE};
pub use features::{FeatureProducer, IdFeatures, VectorFeatures};
