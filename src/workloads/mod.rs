//! Benchmark workloads
//!
//! - `base64`: encode a fixed buffer, timed per operation
//! - `regex`: find all matches of a fixed pattern, timed per operation
//! - `sort`: fill and sort an array of random floats, timed per run
//! - `fib`: naive recursive fibonacci, timed per run

pub mod b64;
pub mod fib;
pub mod pattern;
pub mod sort;

pub use b64::Base64Workload;
pub use fib::FibWorkload;
pub use pattern::RegexWorkload;
pub use sort::SortWorkload;

use crate::{
    error::Result,
    harness::Workload,
    models::Config,
    types::WorkloadKind,
};

/// Build the workload for `kind`, sized from the configuration
pub fn create_workload(kind: WorkloadKind, config: &Config) -> Result<Box<dyn Workload>> {
    let size = config.size_for(kind);
    let workload: Box<dyn Workload> = match kind {
        WorkloadKind::Base64 => Box::new(Base64Workload::new(size)),
        WorkloadKind::Regex => Box::new(RegexWorkload::new(size)?),
        WorkloadKind::Sort => Box::new(SortWorkload::new(size as usize, config.seed)),
        WorkloadKind::Fib => Box::new(FibWorkload::new(size)?),
    };
    Ok(workload)
}
