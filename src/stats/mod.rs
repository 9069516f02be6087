//! Statistical analysis across benchmark rounds

use crate::{
    error::{AppError, Result},
    models::{BenchmarkReport, Statistics},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for statistical calculations
#[derive(Debug, Clone)]
pub struct StatisticsConfig {
    /// Percentiles to calculate (e.g., 50th, 90th, 99th)
    pub percentiles: Vec<f64>,
    /// Coefficient of variation above which results are flagged as noisy
    pub noisy_cv_threshold: f64,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            percentiles: vec![50.0, 90.0, 99.0],
            noisy_cv_threshold: 0.10,
        }
    }
}

/// Round statistics with percentiles and stability metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedStatistics {
    pub basic: Statistics,
    /// Percentile values in seconds, keyed `p50`, `p90`, ...
    pub percentiles: BTreeMap<String, f64>,
    /// Standard deviation divided by mean
    pub coefficient_of_variation: f64,
    /// Rounds outside 1.5 * IQR
    pub outlier_count: usize,
    /// Whether the rounds vary more than the configured threshold
    pub noisy: bool,
}

impl ExtendedStatistics {
    pub fn percentile(&self, p: u32) -> Option<f64> {
        self.percentiles.get(&format!("p{}", p)).copied()
    }
}

/// Statistics engine over the rounds of a report
pub struct StatisticsEngine {
    config: StatisticsConfig,
}

impl StatisticsEngine {
    pub fn new(config: StatisticsConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(StatisticsConfig::default())
    }

    /// Analyze a finalized report
    pub fn analyze(&self, report: &BenchmarkReport) -> Result<ExtendedStatistics> {
        let basic = report
            .statistics
            .clone()
            .ok_or_else(|| AppError::internal("report has no statistics; was it finalized?"))?;

        let mut values = report.round_secs();
        values.sort_by(f64::total_cmp);

        let mut percentiles = BTreeMap::new();
        for &p in &self.config.percentiles {
            percentiles.insert(format!("p{:.0}", p), calculate_percentile(&values, p));
        }

        let coefficient_of_variation = if basic.mean_secs > 0.0 {
            basic.std_dev_secs / basic.mean_secs
        } else {
            0.0
        };

        Ok(ExtendedStatistics {
            basic,
            percentiles,
            coefficient_of_variation,
            outlier_count: count_outliers_iqr(&values),
            noisy: values.len() > 1 && coefficient_of_variation > self.config.noisy_cv_threshold,
        })
    }
}

/// Linear-interpolated percentile over sorted values
pub fn calculate_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let index = (percentile / 100.0) * (sorted_values.len() as f64 - 1.0);
    let lower_index = index.floor() as usize;
    let upper_index = index.ceil() as usize;

    if lower_index == upper_index {
        sorted_values[lower_index]
    } else {
        let lower_value = sorted_values[lower_index];
        let upper_value = sorted_values[upper_index];
        let weight = index - lower_index as f64;
        lower_value + weight * (upper_value - lower_value)
    }
}

/// Count values outside `[q1 - 1.5 * iqr, q3 + 1.5 * iqr]`
fn count_outliers_iqr(sorted_values: &[f64]) -> usize {
    if sorted_values.len() < 4 {
        return 0;
    }

    let q1 = calculate_percentile(sorted_values, 25.0);
    let q3 = calculate_percentile(sorted_values, 75.0);
    let iqr = q3 - q1;
    let (low, high) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    sorted_values.iter().filter(|&&v| v < low || v > high).count()
}
