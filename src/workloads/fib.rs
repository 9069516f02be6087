//! Recursive fibonacci workload

use crate::{
    error::{AppError, Result},
    harness::{Harness, Workload},
    models::Measurement,
    types::{TimedUnit, WorkloadKind},
};

/// Deepest argument accepted; fib(93) is the largest that fits in a u64
pub const MAX_FIB_DEPTH: u64 = 93;

/// Naive recursive fibonacci; exponential on purpose
pub fn fib(n: u64) -> u64 {
    match n {
        0 => 0,
        1 => 1,
        _ => fib(n - 1) + fib(n - 2),
    }
}

/// Computes `fib(depth)` once per run
pub struct FibWorkload {
    depth: u64,
}

impl FibWorkload {
    pub fn new(depth: u64) -> Result<Self> {
        if depth > MAX_FIB_DEPTH {
            return Err(AppError::validation(format!(
                "fib depth {} exceeds maximum of {}",
                depth, MAX_FIB_DEPTH
            )));
        }
        Ok(Self { depth })
    }
}

/// Iterative reference used to check the recursive result
fn fib_iterative(n: u64) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        // The final `next` is fib(n + 1) and may wrap; it is discarded
        let next = a.wrapping_add(b);
        a = b;
        b = next;
    }
    a
}

impl Workload for FibWorkload {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Fib
    }

    fn unit(&self) -> TimedUnit {
        TimedUnit::Run
    }

    fn size(&self) -> u64 {
        self.depth
    }

    fn verify(&mut self) -> Result<()> {
        // The recursive version is too slow to double-check at full depth
        let probe = self.depth.min(20);
        let (recursive, iterative) = (fib(probe), fib_iterative(probe));
        if recursive != iterative {
            return Err(AppError::workload(format!(
                "fib({}) was {}, expected {}",
                probe, recursive, iterative
            )));
        }
        Ok(())
    }

    fn measure(&mut self) -> Result<Measurement> {
        let depth = self.depth;
        let (value, sample) = Harness::once(|| Ok(fib(depth)))?;
        if value != fib_iterative(depth) {
            return Err(AppError::workload(format!("fib({}) returned {}", depth, value)));
        }
        Ok(Measurement::single(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        assert_eq!(fib(0), 0);
        assert_eq!(fib(1), 1);
        assert_eq!(fib(10), 55);
        assert_eq!(fib(30), 832_040);
    }

    #[test]
    fn test_iterative_matches_recursive() {
        for n in 0..25 {
            assert_eq!(fib(n), fib_iterative(n));
        }
        assert_eq!(fib_iterative(93), 12_200_160_415_121_876_738);
    }

    #[test]
    fn test_depth_limit() {
        assert!(FibWorkload::new(93).is_ok());
        assert!(FibWorkload::new(94).is_err());
    }

    #[test]
    fn test_measure_small_depth() {
        let mut workload = FibWorkload::new(15).unwrap();
        workload.verify().unwrap();
        let measurement = workload.measure().unwrap();
        assert!(measurement.phases.is_empty());
    }
}
