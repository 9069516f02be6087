//! Boson Bench
//!
//! A micro-benchmark harness and single-shot TCP echo client used to compare
//! the Boson runtime against reference implementations. Every benchmark runs
//! through one shared harness that times either N repetitions of an operation
//! or one full run over N elements.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod harness;
pub mod logging;
pub mod models;
pub mod output;
pub mod stats;
pub mod types;
pub mod workloads;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use harness::{BenchmarkExecutor, Harness, Workload};
pub use models::{BenchmarkReport, Config, Measurement, Statistics, TimingSample};
pub use output::{OutputCoordinator, OutputFormatter, OutputFormatterFactory};
pub use types::{TimedUnit, WorkloadKind};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build metadata stamped by build.rs
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");
pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");
pub const BUILD_PROFILE: &str = env!("BUILD_PROFILE");

/// One-line build description, e.g. for `--debug` output
pub fn build_info() -> String {
    format!(
        "{} {} ({} {}, built {}, commit {})",
        PKG_NAME, VERSION, TARGET_TRIPLE, BUILD_PROFILE, BUILD_TIME, GIT_COMMIT
    )
}

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_ITERATIONS: u64 = 1_000_000;
    pub const DEFAULT_FIB_DEPTH: u64 = 30;
    pub const DEFAULT_ROUNDS: u32 = 1;
    pub const MAX_ROUNDS: u32 = 100;

    pub const DEFAULT_ECHO_HOST: &str = "127.0.0.1";
    pub const DEFAULT_ECHO_PORT: u16 = 9000;
    pub const DEFAULT_ECHO_MESSAGE: &str = "Hello, world";
    pub const DEFAULT_ECHO_TIMEOUT: Duration = Duration::from_secs(10);
    /// Size of the single receive buffer used by the echo client
    pub const ECHO_RECV_BUFFER: usize = 1024;

    pub const BASE64_PAYLOAD: &[u8] = b"hello, world!";
    pub const BASE64_EXPECTED: &str = "aGVsbG8sIHdvcmxkIQ==";

    pub const REGEX_PATTERN: &str = "he.?.?o";
    pub const REGEX_HAYSTACK: &str = "hello world! hello everyone!";

    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
