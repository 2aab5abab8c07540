pub mod cache;
pub mod classifier;
pub mod grouper;
pub mod hasher;
pub mod pipeline;

pub use cache::ClassificationCache;
pub use classifier::{BatchClassifier, BatchOutcome};
pub use grouper::{group_items, ContentGroup};
pub use hasher::fingerprint;
pub use pipeline::ClassificationPipeline;
