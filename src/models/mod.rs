//! Data models and structures for boson-bench

pub mod config;
pub mod metrics;

// Re-export main model types
pub use config::Config;
pub use metrics::{BenchmarkReport, Measurement, Phase, Statistics, TimingSample};
