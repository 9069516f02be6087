//! Regex find-all workload

use crate::{
    defaults::{REGEX_HAYSTACK, REGEX_PATTERN},
    error::{AppError, Result},
    harness::{Harness, Workload},
    models::Measurement,
    types::{TimedUnit, WorkloadKind},
};
use regex::Regex;

/// Matches a pattern compiled once against a fixed sentence, once per operation
pub struct RegexWorkload {
    pattern: Regex,
    haystack: &'static str,
    expected: Vec<&'static str>,
    harness: Harness,
}

impl RegexWorkload {
    pub fn new(iterations: u64) -> Result<Self> {
        Self::with_pattern(REGEX_PATTERN, REGEX_HAYSTACK, vec!["hello", "hello"], iterations)
    }

    pub fn with_pattern(
        pattern: &str,
        haystack: &'static str,
        expected: Vec<&'static str>,
        iterations: u64,
    ) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            haystack,
            expected,
            harness: Harness::new(iterations),
        })
    }

    /// All non-overlapping matches, leftmost first
    pub fn find_all(&self) -> Vec<&'static str> {
        let haystack = self.haystack;
        self.pattern.find_iter(haystack).map(|m| m.as_str()).collect()
    }
}

impl Workload for RegexWorkload {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Regex
    }

    fn unit(&self) -> TimedUnit {
        TimedUnit::Operation
    }

    fn size(&self) -> u64 {
        self.harness.iterations()
    }

    fn verify(&mut self) -> Result<()> {
        let found = self.find_all();
        if found != self.expected {
            return Err(AppError::workload(format!(
                "pattern {} over {:?} matched {:?}, expected {:?}",
                self.pattern.as_str(),
                self.haystack,
                found,
                self.expected
            )));
        }
        Ok(())
    }

    fn measure(&mut self) -> Result<Measurement> {
        let expected_count = self.expected.len();
        let sample = self.harness.repeat(|| {
            let found = self.find_all();
            // Cheap per-iteration stability check on the compiled pattern
            if found.len() != expected_count {
                return Err(AppError::workload(format!(
                    "match count changed from {} to {} during the run",
                    expected_count,
                    found.len()
                )));
            }
            Ok(found)
        })?;
        Ok(Measurement::single(sample))
    }
}
