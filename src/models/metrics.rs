//! Timing samples, measurements and benchmark report data models

use crate::types::{TimedUnit, WorkloadKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// A pair of monotonic instants bracketing one timed region
#[derive(Debug, Clone, Copy)]
pub struct TimingSample {
    pub start: Instant,
    pub end: Instant,
}

impl TimingSample {
    /// Start a sample now; call [`TimingSample::finish`] to close it
    pub fn start() -> Instant {
        Instant::now()
    }

    /// Close a sample that was started at `start`
    pub fn finish(start: Instant) -> Self {
        Self { start, end: Instant::now() }
    }

    /// Elapsed time between start and end
    pub fn elapsed(&self) -> Duration {
        // Instants are monotonic, so this never underflows in practice
        self.end.saturating_duration_since(self.start)
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

/// A named part of a measurement, e.g. `fill` and `sort`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

impl Phase {
    pub fn new<S: Into<String>>(name: S, elapsed: Duration) -> Self {
        Self { name: name.into(), elapsed }
    }
}

/// One timed execution of a workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Headline duration
    #[serde(with = "duration_secs")]
    pub total: Duration,

    /// Breakdown of the headline duration; empty for single-phase workloads
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phases: Vec<Phase>,
}

impl Measurement {
    /// Measurement with no phase breakdown
    pub fn single(sample: TimingSample) -> Self {
        Self { total: sample.elapsed(), phases: Vec::new() }
    }

    /// Measurement whose total is the sum of its phases
    pub fn from_phases(phases: Vec<Phase>) -> Self {
        let total = phases.iter().map(|p| p.elapsed).sum();
        Self { total, phases }
    }

    pub fn total_secs(&self) -> f64 {
        self.total.as_secs_f64()
    }

    /// Look up a phase by name
    pub fn phase(&self, name: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.name == name)
    }
}

/// Summary statistics over the rounds of one benchmark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
    pub sample_count: usize,
    pub min_secs: f64,
    pub max_secs: f64,
    pub mean_secs: f64,
    pub std_dev_secs: f64,
    /// Mean time per operation, only meaningful for per-operation workloads
    pub ns_per_op: Option<f64>,
}

impl Statistics {
    /// Calculate statistics from the rounds of a benchmark
    pub fn from_measurements(measurements: &[Measurement], unit: TimedUnit, size: u64) -> Self {
        let count = measurements.len();

        if count == 0 {
            return Self::empty();
        }

        let totals: Vec<f64> = measurements.iter().map(|m| m.total_secs()).collect();
        let mean = totals.iter().sum::<f64>() / count as f64;
        let min = totals.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = totals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let variance = if count > 1 {
            totals.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / count as f64
        } else {
            0.0
        };

        let ns_per_op = match unit {
            TimedUnit::Operation if size > 0 => Some(mean * 1e9 / size as f64),
            _ => None,
        };

        Self {
            sample_count: count,
            min_secs: min,
            max_secs: max,
            mean_secs: mean,
            std_dev_secs: variance.sqrt(),
            ns_per_op,
        }
    }

    /// Create empty statistics
    pub fn empty() -> Self {
        Self {
            sample_count: 0,
            min_secs: 0.0,
            max_secs: 0.0,
            mean_secs: 0.0,
            std_dev_secs: 0.0,
            ns_per_op: None,
        }
    }

    /// Operations per second derived from the mean, when defined
    pub fn ops_per_sec(&self) -> Option<f64> {
        self.ns_per_op.filter(|ns| *ns > 0.0).map(|ns| 1e9 / ns)
    }
}

/// Full result of running one workload for one or more rounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub workload: WorkloadKind,
    pub unit: TimedUnit,
    /// Repetitions, element count or fibonacci argument, depending on the workload
    pub size: u64,
    pub rounds: Vec<Measurement>,
    pub statistics: Option<Statistics>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl BenchmarkReport {
    pub fn new(workload: WorkloadKind, unit: TimedUnit, size: u64) -> Self {
        Self {
            workload,
            unit,
            size,
            rounds: Vec::new(),
            statistics: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn add_round(&mut self, measurement: Measurement) {
        self.rounds.push(measurement);
    }

    /// Calculate and store statistics, marking the report complete
    pub fn finalize(&mut self) {
        if !self.rounds.is_empty() {
            self.statistics = Some(Statistics::from_measurements(&self.rounds, self.unit, self.size));
        }
        self.completed_at = Some(Utc::now());
    }

    /// Durations of every round, in seconds
    pub fn round_secs(&self) -> Vec<f64> {
        self.rounds.iter().map(|m| m.total_secs()).collect()
    }
}

/// Serialize durations as fractional seconds
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn measurement_ms(ms: u64) -> Measurement {
        Measurement { total: Duration::from_millis(ms), phases: Vec::new() }
    }

    #[test]
    fn test_timing_sample_elapsed() {
        let start = TimingSample::start();
        thread::sleep(Duration::from_millis(2));
        let sample = TimingSample::finish(start);

        assert!(sample.elapsed() >= Duration::from_millis(2));
        assert!(sample.elapsed_secs() > 0.0);
    }

    #[test]
    fn test_measurement_from_phases() {
        let measurement = Measurement::from_phases(vec![
            Phase::new("fill", Duration::from_millis(30)),
            Phase::new("sort", Duration::from_millis(70)),
        ]);

        assert_eq!(measurement.total, Duration::from_millis(100));
        assert_eq!(measurement.phase("sort").unwrap().elapsed, Duration::from_millis(70));
        assert!(measurement.phase("shuffle").is_none());
    }

    #[test]
    fn test_statistics_calculation() {
        let rounds = vec![measurement_ms(100), measurement_ms(200)];
        let stats = Statistics::from_measurements(&rounds, TimedUnit::Operation, 1_000);

        assert_eq!(stats.sample_count, 2);
        assert!((stats.mean_secs - 0.15).abs() < 1e-9);
        assert!((stats.min_secs - 0.1).abs() < 1e-9);
        assert!((stats.max_secs - 0.2).abs() < 1e-9);
        assert!((stats.std_dev_secs - 0.05).abs() < 1e-9);
        // 0.15s over 1000 ops
        assert!((stats.ns_per_op.unwrap() - 150_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_statistics_run_unit_has_no_per_op() {
        let stats = Statistics::from_measurements(&[measurement_ms(10)], TimedUnit::Run, 1_000_000);
        assert!(stats.ns_per_op.is_none());
        assert!(stats.ops_per_sec().is_none());
        assert_eq!(stats.std_dev_secs, 0.0);
    }

    #[test]
    fn test_statistics_zero_size() {
        let stats = Statistics::from_measurements(&[measurement_ms(0)], TimedUnit::Operation, 0);
        assert!(stats.ns_per_op.is_none());
    }

    #[test]
    fn test_empty_statistics() {
        let stats = Statistics::from_measurements(&[], TimedUnit::Operation, 10);
        assert_eq!(stats.sample_count, 0);
        assert_eq!(stats.mean_secs, 0.0);
    }

    #[test]
    fn test_report_finalize() {
        let mut report = BenchmarkReport::new(WorkloadKind::Base64, TimedUnit::Operation, 10);
        report.finalize();
        assert!(report.statistics.is_none());
        assert!(report.completed_at.is_some());

        let mut report = BenchmarkReport::new(WorkloadKind::Base64, TimedUnit::Operation, 10);
        report.add_round(measurement_ms(5));
        report.add_round(measurement_ms(15));
        report.finalize();
        assert_eq!(report.statistics.as_ref().unwrap().sample_count, 2);
        assert_eq!(report.round_secs(), vec![0.005, 0.015]);
    }

    #[test]
    fn test_measurement_serializes_seconds() {
        let measurement = Measurement::from_phases(vec![
            Phase::new("fill", Duration::from_millis(250)),
            Phase::new("sort", Duration::from_millis(250)),
        ]);
        let json = serde_json::to_value(&measurement).unwrap();
        assert_eq!(json["total"], serde_json::json!(0.5));
        assert_eq!(json["phases"][0]["name"], "fill");

        let back: Measurement = serde_json::from_value(json).unwrap();
        assert_eq!(back.total, Duration::from_millis(500));
    }

    #[test]
    fn test_single_phase_omits_phases() {
        let start = TimingSample::start();
        let measurement = Measurement::single(TimingSample::finish(start));
        let json = serde_json::to_string(&measurement).unwrap();
        assert!(!json.contains("phases"));
    }
}
