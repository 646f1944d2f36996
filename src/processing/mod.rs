//! Resume screening: normalization, extraction, similarity, scoring and ranking

pub mod candidate;
pub mod events;
pub mod extractors;
pub mod fallback;
pub mod pipeline;
pub mod roles;
pub mod scoring;
pub mod similarity;
pub mod text_processor;
