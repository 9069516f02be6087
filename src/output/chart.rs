//! Grouped bar chart comparing Python and Boson call timings

use crate::error::{AppError, Result};

/// Function-call counts on the x axis
pub const CALL_COUNTS: [u64; 5] = [100, 1_000, 10_000, 100_000, 1_000_000];

/// Measured seconds per call count
pub const PYTHON_SECS: [f64; 5] = [0.00095796, 0.01006150, 0.1456694, 2.51394, 23.467905];
pub const BOSON_SECS: [f64; 5] = [0.0014064311, 0.010024547, 0.1464130, 2.2045967, 21.82820];

pub const X_LABEL: &str = "Number of function calls";
pub const Y_LABEL: &str = "Time taken (ms)";

/// Evenly spaced values in `[start, stop)`
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || stop <= start {
        return Vec::new();
    }
    let count = ((stop - start) / step).ceil() as usize;
    (0..count).map(|i| start + i as f64 * step).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    /// One value per category, in milliseconds
    pub values_ms: Vec<f64>,
}

/// One bar as it will be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct BarRow {
    pub category: String,
    pub series_index: usize,
    /// `<category> <series>`
    pub label: String,
    pub value_ms: f64,
    pub bar_len: usize,
}

#[derive(Debug, Clone)]
pub struct BarChart {
    categories: Vec<String>,
    series: Vec<Series>,
    x_label: String,
    y_label: String,
    y_ticks: Vec<f64>,
}

impl BarChart {
    pub fn new<S: ToString>(categories: &[S], x_label: &str, y_label: &str) -> Self {
        Self {
            categories: categories.iter().map(|c| c.to_string()).collect(),
            series: Vec::new(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            y_ticks: Vec::new(),
        }
    }

    /// The fixed Python vs Boson comparison
    pub fn comparison() -> Result<Self> {
        let mut chart = Self::new(&CALL_COUNTS, X_LABEL, Y_LABEL);
        chart.add_series_secs("Python", &PYTHON_SECS)?;
        chart.add_series_secs("Boson", &BOSON_SECS)?;
        chart.set_y_ticks(arange(0.0, 30.0 * 1000.0, 1000.0));
        Ok(chart)
    }

    /// Add a series given in seconds; stored in milliseconds
    pub fn add_series_secs(&mut self, label: &str, values_secs: &[f64]) -> Result<()> {
        if values_secs.len() != self.categories.len() {
            return Err(AppError::validation(format!(
                "series {} has {} values for {} categories",
                label,
                values_secs.len(),
                self.categories.len()
            )));
        }
        self.series.push(Series {
            label: label.to_string(),
            values_ms: values_secs.iter().map(|v| v * 1000.0).collect(),
        });
        Ok(())
    }

    pub fn set_y_ticks(&mut self, ticks: Vec<f64>) {
        self.y_ticks = ticks;
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn y_ticks(&self) -> &[f64] {
        &self.y_ticks
    }

    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    pub fn bar_count(&self) -> usize {
        self.series.iter().map(|s| s.values_ms.len()).sum()
    }

    /// `first, second, ..., last`, or `none`
    pub fn tick_summary(&self) -> String {
        match self.y_ticks.as_slice() {
            [] => "none".to_string(),
            [only] => format!("{}", only),
            [first, second] => format!("{}, {}", first, second),
            [first, second, .., last] => format!("{}, {}, ..., {}", first, second, last),
        }
    }

    /// Bars grouped by category, scaled so the larger of the top tick and
    /// the largest value spans `width` cells
    pub fn layout(&self, width: usize) -> Vec<BarRow> {
        let largest = self
            .series
            .iter()
            .flat_map(|s| s.values_ms.iter().copied())
            .chain(self.y_ticks.last().copied())
            .fold(0.0_f64, f64::max);

        let mut rows = Vec::with_capacity(self.bar_count());
        for (cat_idx, category) in self.categories.iter().enumerate() {
            for (series_index, series) in self.series.iter().enumerate() {
                let value_ms = series.values_ms[cat_idx];
                let bar_len = if largest > 0.0 {
                    (value_ms / largest * width as f64).round() as usize
                } else {
                    0
                };
                rows.push(BarRow {
                    category: category.clone(),
                    series_index,
                    label: format!("{} {}", category, series.label),
                    value_ms,
                    bar_len,
                });
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_has_ten_bars() {
        let chart = BarChart::comparison().unwrap();
        assert_eq!(chart.bar_count(), 10);
        assert_eq!(chart.layout(50).len(), 10);
        assert_eq!(chart.categories(), &["100", "1000", "10000", "100000", "1000000"]);
    }

    #[test]
    fn test_ticks_exclude_upper_bound() {
        let chart = BarChart::comparison().unwrap();
        let ticks = chart.y_ticks();
        assert_eq!(ticks.len(), 30);
        assert_eq!(ticks[0], 0.0);
        assert_eq!(ticks[1], 1000.0);
        assert_eq!(*ticks.last().unwrap(), 29000.0);
        assert_eq!(chart.tick_summary(), "0, 1000, ..., 29000");
    }

    #[test]
    fn test_values_converted_to_ms() {
        let chart = BarChart::comparison().unwrap();
        let python = &chart.series()[0];
        assert_eq!(python.label, "Python");
        assert!((python.values_ms[4] - 23_467.905).abs() < 1e-6);
        assert!((chart.series()[1].values_ms[0] - 1.4064311).abs() < 1e-9);
    }

    #[test]
    fn test_layout_groups_pairs() {
        let chart = BarChart::comparison().unwrap();
        let rows = chart.layout(29);
        assert_eq!(rows[0].label, "100 Python");
        assert_eq!(rows[1].label, "100 Boson");
        assert_eq!(rows[9].category, "1000000");
        // 23467.905 / 29000 * 29
        assert_eq!(rows[8].bar_len, 23);
    }

    #[test]
    fn test_series_length_mismatch() {
        let mut chart = BarChart::new(&CALL_COUNTS, X_LABEL, Y_LABEL);
        assert!(chart.add_series_secs("short", &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_arange_edges() {
        assert!(arange(0.0, 0.0, 1.0).is_empty());
        assert!(arange(0.0, 10.0, 0.0).is_empty());
        assert_eq!(arange(0.0, 2.5, 1.0), vec![0.0, 1.0, 2.0]);
    }
}
