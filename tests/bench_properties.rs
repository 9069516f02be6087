//! Property tests for the harness and workloads

use boson_bench::client::bytes_repr;
use boson_bench::harness::{BenchmarkExecutor, Harness};
use boson_bench::models::Config;
use boson_bench::stats::calculate_percentile;
use boson_bench::workloads::{create_workload, fib, sort};
use boson_bench::WorkloadKind;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

proptest! {
    #[test]
    fn sorted_output_is_ordered_permutation(values in prop::collection::vec(0.0f64..1.0, 0..500)) {
        let mut sorted = values.clone();
        sort::sort_samples(&mut sorted);
        prop_assert!(sort::is_non_decreasing(&sorted));
        prop_assert!(sort::is_permutation_of(&sorted, &values));
    }

    #[test]
    fn filled_values_stay_in_unit_interval(seed in any::<u64>(), len in 0usize..300) {
        let mut samples = vec![2.0; len];
        let mut rng = StdRng::seed_from_u64(seed);
        sort::fill_samples(&mut samples, &mut rng);
        prop_assert!(samples.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn harness_calls_op_exactly_n_times(n in 0u64..2000) {
        let mut calls = 0u64;
        Harness::new(n).repeat(|| {
            calls += 1;
            Ok(())
        }).unwrap();
        prop_assert_eq!(calls, n);
    }

    #[test]
    fn recursive_fib_satisfies_recurrence(n in 2u64..22) {
        prop_assert_eq!(fib::fib(n), fib::fib(n - 1) + fib::fib(n - 2));
    }

    #[test]
    fn bytes_repr_is_ascii_and_delimited(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let repr = bytes_repr(&data);
        prop_assert!(repr.is_ascii());
        prop_assert!(repr.starts_with("b'") || repr.starts_with("b\""));
        let quote = repr.as_bytes()[1];
        prop_assert_eq!(repr.as_bytes()[repr.len() - 1], quote);
    }

    #[test]
    fn percentile_is_bounded_by_extremes(mut values in prop::collection::vec(0.0f64..100.0, 1..50), p in 0.0f64..100.0) {
        values.sort_by(f64::total_cmp);
        let result = calculate_percentile(&values, p);
        prop_assert!(result >= values[0] - f64::EPSILON);
        prop_assert!(result <= values[values.len() - 1] + f64::EPSILON);
    }
}

#[tokio::test]
async fn executor_reports_one_measurement_per_round() {
    let config = Config {
        iterations: Some(200),
        seed: Some(11),
        ..Default::default()
    };

    for kind in WorkloadKind::ALL {
        let size_config = if kind == WorkloadKind::Fib {
            Config { fib_depth: Some(12), ..config.clone() }
        } else {
            config.clone()
        };
        let mut workload = create_workload(kind, &size_config).unwrap();
        let report = BenchmarkExecutor::new(4).run(workload.as_mut()).await.unwrap();

        assert_eq!(report.workload, kind);
        assert_eq!(report.rounds.len(), 4);
        assert_eq!(report.round_secs().len(), 4);
        assert!(report.statistics.is_some());
        assert!(report.completed_at.is_some());
    }
}

#[tokio::test]
async fn sort_rounds_sum_their_phases() {
    let config = Config {
        iterations: Some(5_000),
        seed: Some(7),
        ..Default::default()
    };
    let mut workload = create_workload(WorkloadKind::Sort, &config).unwrap();
    let report = BenchmarkExecutor::new(2).run(workload.as_mut()).await.unwrap();

    for round in &report.rounds {
        let fill = round.phase(sort::FILL_PHASE).unwrap().elapsed;
        let sorted = round.phase(sort::SORT_PHASE).unwrap().elapsed;
        assert_eq!(round.total, fill + sorted);
    }
}
