//! Benchmark harness
//!
//! One reusable timing loop for every workload. A workload declares whether
//! its timed unit is a single operation (timed `size` times) or one full run
//! over `size` elements; the harness never mixes the two.

use crate::{
    error::Result,
    logging::BenchLogger,
    models::{BenchmarkReport, Measurement, TimingSample},
    types::{TimedUnit, WorkloadKind},
};
use std::hint::black_box;

/// Sequential timing loop over a fixed repeat count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Harness {
    iterations: u64,
}

impl Harness {
    /// Create a harness that repeats an operation `iterations` times; zero is allowed
    pub fn new(iterations: u64) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Run `op` exactly `iterations` times and time the whole loop.
    ///
    /// The first error returned by `op` stops the loop and is propagated.
    pub fn repeat<F, T>(&self, mut op: F) -> Result<TimingSample>
    where
        F: FnMut() -> Result<T>,
    {
        let start = TimingSample::start();
        for _ in 0..self.iterations {
            black_box(op()?);
        }
        Ok(TimingSample::finish(start))
    }

    /// Time a single invocation of `op`
    pub fn once<F, T>(op: F) -> Result<(T, TimingSample)>
    where
        F: FnOnce() -> Result<T>,
    {
        let start = TimingSample::start();
        let output = black_box(op()?);
        Ok((output, TimingSample::finish(start)))
    }
}

/// A benchmark payload driven by the harness
pub trait Workload {
    fn kind(&self) -> WorkloadKind;

    /// What one measurement covers
    fn unit(&self) -> TimedUnit;

    /// Repetitions for `Operation` workloads, problem size for `Run` workloads
    fn size(&self) -> u64;

    /// Check once, untimed, that the workload computes the expected result
    fn verify(&mut self) -> Result<()>;

    /// Perform one timed measurement
    fn measure(&mut self) -> Result<Measurement>;
}

/// Drives a workload through verification and its timed rounds
pub struct BenchmarkExecutor {
    rounds: u32,
    logger: Option<BenchLogger>,
}

impl BenchmarkExecutor {
    pub fn new(rounds: u32) -> Self {
        Self { rounds, logger: None }
    }

    /// Attach a logger for per-round timing events
    pub fn with_logger(mut self, logger: BenchLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Verify the workload, measure it once per round and build the report
    pub async fn run(&self, workload: &mut dyn Workload) -> Result<BenchmarkReport> {
        let Some(logger) = &self.logger else {
            return self.measure_rounds(workload).await;
        };

        // Entries logged during the run inherit this correlation id
        let correlation_id = logger.begin_run(workload.kind()).await;
        let result = self.measure_rounds(workload).await;
        logger
            .finish_run(&correlation_id, workload.kind(), result.is_ok())
            .await;
        result
    }

    async fn measure_rounds(&self, workload: &mut dyn Workload) -> Result<BenchmarkReport> {
        let mut report = BenchmarkReport::new(workload.kind(), workload.unit(), workload.size());

        workload.verify()?;
        if let Some(logger) = &self.logger {
            logger.log_verified(workload.kind(), workload.unit(), workload.size()).await;
        }

        for round in 0..self.rounds {
            // Measurement runs synchronously; nothing in it yields to the runtime
            let measurement = workload.measure()?;
            if let Some(logger) = &self.logger {
                logger.log_round(workload.kind(), round + 1, &measurement).await;
            }
            report.add_round(measurement);
        }

        report.finalize();

        if let Some(logger) = &self.logger {
            logger.log_report(&report).await;
        }

        Ok(report)
    }
}
