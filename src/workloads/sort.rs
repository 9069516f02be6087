//! Random-float fill and sort workload
//!
//! Timed as one run: the array is filled element by element and then sorted
//! in place. Fill and sort are recorded as separate phases; the headline
//! duration is their sum.

use crate::{
    error::{AppError, Result},
    harness::{Harness, Workload},
    models::{Measurement, Phase},
    types::{TimedUnit, WorkloadKind},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const FILL_PHASE: &str = "fill";
pub const SORT_PHASE: &str = "sort";

/// Fills and sorts `len` floats drawn from `[0, 1)`
pub struct SortWorkload {
    len: usize,
    rng: StdRng,
    samples: Vec<f64>,
}

impl SortWorkload {
    /// `seed` makes the generated values reproducible
    pub fn new(len: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            len,
            rng,
            // Allocated up front so the timed fill does not grow the vector
            samples: vec![0.0; len],
        }
    }

    /// Values left in place by the last measurement
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

/// Overwrite every element with a fresh value in `[0, 1)`
pub fn fill_samples<R: Rng>(samples: &mut [f64], rng: &mut R) {
    for slot in samples.iter_mut() {
        *slot = rng.gen::<f64>();
    }
}

/// Sort in place, ascending
pub fn sort_samples(samples: &mut [f64]) {
    samples.sort_unstable_by(f64::total_cmp);
}

/// `true` when every adjacent pair satisfies `a[i] <= a[i + 1]`
pub fn is_non_decreasing(samples: &[f64]) -> bool {
    samples.windows(2).all(|pair| pair[0] <= pair[1])
}

/// `true` when `sorted` holds exactly the values of `original`
pub fn is_permutation_of(sorted: &[f64], original: &[f64]) -> bool {
    if sorted.len() != original.len() {
        return false;
    }
    let mut expected = original.to_vec();
    expected.sort_unstable_by(f64::total_cmp);
    expected
        .iter()
        .zip(sorted.iter())
        .all(|(a, b)| a.to_bits() == b.to_bits())
}

impl Workload for SortWorkload {
    fn kind(&self) -> WorkloadKind {
        WorkloadKind::Sort
    }

    fn unit(&self) -> TimedUnit {
        TimedUnit::Run
    }

    fn size(&self) -> u64 {
        self.len as u64
    }

    fn verify(&mut self) -> Result<()> {
        // Smaller than the timed run, enough to catch an ordering bug
        let mut probe = vec![0.0; self.len.min(10_000)];
        fill_samples(&mut probe, &mut self.rng);
        if probe.iter().any(|v| !(0.0..1.0).contains(v)) {
            return Err(AppError::workload("random sample outside [0, 1)"));
        }
        let original = probe.clone();
        sort_samples(&mut probe);

        if !is_non_decreasing(&probe) {
            return Err(AppError::workload("sorted samples are not non-decreasing"));
        }
        if !is_permutation_of(&probe, &original) {
            return Err(AppError::workload("sorted samples are not a permutation of the input"));
        }
        Ok(())
    }

    fn measure(&mut self) -> Result<Measurement> {
        let samples = &mut self.samples;
        let rng = &mut self.rng;

        let ((), fill) = Harness::once(|| {
            fill_samples(samples.as_mut_slice(), rng);
            Ok(())
        })?;
        let ((), sort) = Harness::once(|| {
            sort_samples(samples.as_mut_slice());
            Ok(())
        })?;

        if !is_non_decreasing(&self.samples) {
            return Err(AppError::workload("sorted samples are not non-decreasing"));
        }

        Ok(Measurement::from_phases(vec![
            Phase::new(FILL_PHASE, fill.elapsed()),
            Phase::new(SORT_PHASE, sort.elapsed()),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_leaves_sorted_array() {
        let mut workload = SortWorkload::new(10_000, Some(7));
        workload.verify().unwrap();
        let measurement = workload.measure().unwrap();

        assert_eq!(workload.samples().len(), 10_000);
        assert!(is_non_decreasing(workload.samples()));
        assert!(workload.samples().iter().all(|v| (0.0..1.0).contains(v)));
        assert_eq!(measurement.phases.len(), 2);
        assert_eq!(
            measurement.total,
            measurement.phase(FILL_PHASE).unwrap().elapsed + measurement.phase(SORT_PHASE).unwrap().elapsed
        );
    }

    #[test]
    fn test_seed_reproducible() {
        let mut a = SortWorkload::new(100, Some(42));
        let mut b = SortWorkload::new(100, Some(42));
        a.measure().unwrap();
        b.measure().unwrap();
        assert_eq!(a.samples(), b.samples());
    }

    #[test]
    fn test_empty_array() {
        let mut workload = SortWorkload::new(0, None);
        workload.verify().unwrap();
        let measurement = workload.measure().unwrap();
        assert!(workload.samples().is_empty());
        assert!(measurement.total.as_millis() < 10);
    }

    #[test]
    fn test_permutation_check() {
        let original = [0.5, 0.25, 0.75];
        assert!(is_permutation_of(&[0.25, 0.5, 0.75], &original));
        assert!(!is_permutation_of(&[0.25, 0.5, 0.5], &original));
        assert!(!is_permutation_of(&[0.25, 0.5], &original));
    }

    #[test]
    fn test_non_decreasing_allows_ties() {
        assert!(is_non_decreasing(&[0.1, 0.1, 0.2]));
        assert!(!is_non_decreasing(&[0.2, 0.1]));
        assert!(is_non_decreasing(&[]));
    }
}
