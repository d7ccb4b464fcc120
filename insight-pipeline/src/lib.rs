pub mod candidate_pipeline;
pub mod components;
pub mod error;
pub mod filter;
pub mod hydrator;
pub mod order_loader;
pub mod pipelines;
pub mod query_hydrator;
pub mod reports;
pub mod rfm_extractor;
pub mod scorer;
pub mod segment_classifier;
pub mod selector;
pub mod side_effect;
pub mod source;
pub mod types;
pub mod util;
