pub mod batch;
pub mod calculations;
pub mod engine;
pub mod location;
pub mod profile_builder;
pub mod recommender;
pub mod scoring;
pub mod zone_detector;

#[cfg(test)]
pub(crate) mod fixtures;

pub use batch::BatchAnalyzer;
pub use engine::AnalysisEngine;
pub use scoring::SuitabilityScorer;
