//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// What a single measurement covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimedUnit {
    /// The measurement covers `size` repetitions of one operation
    Operation,
    /// The measurement covers one full run over `size` elements
    Run,
}

impl TimedUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimedUnit::Operation => "operation",
            TimedUnit::Run => "run",
        }
    }
}

impl fmt::Display for TimedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Benchmark workloads shipped with the tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadKind {
    /// Base64-encode a fixed 13-byte buffer
    Base64,
    /// Find all matches of a fixed pattern in a fixed sentence
    Regex,
    /// Fill an array with random floats and sort it
    Sort,
    /// Recursive fibonacci
    Fib,
}

impl WorkloadKind {
    pub const ALL: [WorkloadKind; 4] = [
        WorkloadKind::Base64,
        WorkloadKind::Regex,
        WorkloadKind::Sort,
        WorkloadKind::Fib,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WorkloadKind::Base64 => "base64",
            WorkloadKind::Regex => "regex",
            WorkloadKind::Sort => "sort",
            WorkloadKind::Fib => "fib",
        }
    }

    /// Default size: repetitions, element count or fibonacci argument
    pub fn default_size(&self) -> u64 {
        match self {
            WorkloadKind::Fib => crate::defaults::DEFAULT_FIB_DEPTH,
            _ => crate::defaults::DEFAULT_ITERATIONS,
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WorkloadKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "base64" | "b64" => Ok(WorkloadKind::Base64),
            "regex" | "re" => Ok(WorkloadKind::Regex),
            "sort" => Ok(WorkloadKind::Sort),
            "fib" | "fibonacci" => Ok(WorkloadKind::Fib),
            _ => Err(AppError::parse(format!("Unknown workload: {}", s))),
        }
    }
}

/// Lifecycle of the echo client's single connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    Sent,
    Received,
    Closed,
    /// Terminal error state, reachable from any transition
    Failed,
}

impl ConnectionState {
    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectionState::Closed | ConnectionState::Failed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connected => "connected",
            ConnectionState::Sent => "sent",
            ConnectionState::Received => "received",
            ConnectionState::Closed => "closed",
            ConnectionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workload_kind_parsing() {
        assert_eq!("base64".parse::<WorkloadKind>().unwrap(), WorkloadKind::Base64);
        assert_eq!("B64".parse::<WorkloadKind>().unwrap(), WorkloadKind::Base64);
        assert_eq!("re".parse::<WorkloadKind>().unwrap(), WorkloadKind::Regex);
        assert_eq!("fibonacci".parse::<WorkloadKind>().unwrap(), WorkloadKind::Fib);
        assert!("bogosort".parse::<WorkloadKind>().is_err());
    }

    #[test]
    fn test_default_sizes() {
        assert_eq!(WorkloadKind::Base64.default_size(), 1_000_000);
        assert_eq!(WorkloadKind::Sort.default_size(), 1_000_000);
        assert_eq!(WorkloadKind::Fib.default_size(), 30);
    }

    #[test]
    fn test_terminal_states() {
        assert!(ConnectionState::Closed.is_terminal());
        assert!(ConnectionState::Failed.is_terminal());
        assert!(!ConnectionState::Sent.is_terminal());
    }
}
