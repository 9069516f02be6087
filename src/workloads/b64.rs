//! Base64 encoding workload

use crate::{
    defaults::{BASE64_EXPECTED, BASE64_PAYLOAD},
    error::{AppError, Result},
    harness::{Harness, Workload},
    models::Measurement,
    types::{TimedUnit, WorkloadKind},
};
use base64::{engine::general_purpose::STANDARD, Engine};

/// Encodes the fixed payload buffer once per operation
pub struct Base64Workload {
    payload: &'static [u8],
    expected: &'static str,
    harness: Harness,
}

impl Base64Workload {
    pub fn new(iterations: u64) -> Self {
        Self {
            payload: BASE64_PAYLOAD,
            expected: BASE64_EXPECTED,
            harness: Harness::new(iterations),
        }
    }

    /// One unit of work
    pub fn encode(&self) -> String {
        STANDARD.encode(self.payload)
    }
}

impl Workload for Base64Workload {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Base64
    }

    fn unit(&self) -> TimedUnit {
        TimedUnit::Operation
    }

    fn size(&self) -> u64 {
        self.harness.iterations()
    }

    fn verify(&mut self) -> Result<()> {
        let encoded = self.encode();
        if encoded != self.expected {
            return Err(AppError::workload(format!(
                "base64 of {:?} was {}, expected {}",
                String::from_utf8_lossy(self.payload),
                encoded,
                self.expected
            )));
        }
        Ok(())
    }

    fn measure(&mut self) -> Result<Measurement> {
        let sample = self.harness.repeat(|| Ok(self.encode()))?;
        Ok(Measurement::single(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_fixed_buffer() {
        let workload = Base64Workload::new(1);
        assert_eq!(workload.encode(), "aGVsbG8sIHdvcmxkIQ==");
    }

    #[test]
    fn test_encode_is_repeatable() {
        let workload = Base64Workload::new(1_000);
        let first = workload.encode();
        for _ in 0..1_000 {
            assert_eq!(workload.encode(), first);
        }
    }

    #[test]
    fn test_verify_and_measure() {
        let mut workload = Base64Workload::new(10_000);
        workload.verify().unwrap();
        let measurement = workload.measure().unwrap();
        assert!(measurement.phases.is_empty());
        assert_eq!(workload.size(), 10_000);
    }

    #[test]
    fn test_verify_catches_wrong_expectation() {
        let mut workload = Base64Workload::new(1);
        workload.expected = "aGVsbG8=";
        assert!(workload.verify().is_err());
    }
}
