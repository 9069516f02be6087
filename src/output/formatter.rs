//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation with table formatting capabilities.

use super::chart::BarChart;
use crate::{
    client::EchoExchange,
    error::{AppError, Result},
    models::BenchmarkReport,
    stats::ExtendedStatistics,
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the statistics summary of a finished benchmark
    fn format_report_summary(&self, report: &BenchmarkReport, analysis: &ExtendedStatistics) -> Result<String>;

    /// Format one row per round, with a column per phase
    fn format_rounds_table(&self, report: &BenchmarkReport) -> Result<String>;

    /// Format connection details of an echo exchange
    fn format_echo_details(&self, exchange: &EchoExchange) -> Result<String>;

    /// Format the comparison bar chart
    fn format_chart(&self, chart: &BarChart) -> Result<String>;

    fn format_error(&self, error: &str) -> Result<String>;

    fn format_warning(&self, warning: &str) -> Result<String>;

    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Enable verbose mode with detailed information
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Maximum output width
    pub max_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
            max_width: 100,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub columns: Vec<Column>,
    pub show_borders: bool,
    pub show_header: bool,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
    pub min_width: usize,
    pub max_width: usize,
}

impl Column {
    pub fn new(header: &str, alignment: Alignment) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            min_width: 4,
            max_width: 40,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Human-readable duration from seconds, picking ns, µs, ms or s
pub fn format_duration(secs: f64) -> String {
    if secs < 1e-6 {
        format!("{:.0}ns", secs * 1e9)
    } else if secs < 1e-3 {
        format!("{:.2}µs", secs * 1e6)
    } else if secs < 1.0 {
        format!("{:.3}ms", secs * 1e3)
    } else {
        format!("{:.3}s", secs)
    }
}

/// Summary rows shared by the plain and colored formatters
pub(super) fn summary_rows(report: &BenchmarkReport, analysis: &ExtendedStatistics) -> Vec<RowData> {
    let stats = &analysis.basic;
    let mut rows = vec![
        vec!["Workload".to_string(), report.workload.to_string()],
        vec!["Timed unit".to_string(), report.unit.to_string()],
        vec!["Size".to_string(), report.size.to_string()],
        vec!["Rounds".to_string(), stats.sample_count.to_string()],
        vec!["Mean".to_string(), format_duration(stats.mean_secs)],
        vec!["Min".to_string(), format_duration(stats.min_secs)],
        vec!["Max".to_string(), format_duration(stats.max_secs)],
        vec!["Std dev".to_string(), format_duration(stats.std_dev_secs)],
    ];

    for (name, secs) in &analysis.percentiles {
        rows.push(vec![name.clone(), format_duration(*secs)]);
    }

    if let Some(ns) = stats.ns_per_op {
        rows.push(vec!["Per operation".to_string(), format!("{:.1}ns", ns)]);
    }
    if let Some(ops) = stats.ops_per_sec() {
        rows.push(vec!["Throughput".to_string(), format!("{:.0} ops/s", ops)]);
    }
    if analysis.outlier_count > 0 {
        rows.push(vec!["Outliers".to_string(), analysis.outlier_count.to_string()]);
    }
    rows
}

/// Round table layout: `Round`, `Total`, then one column per phase
pub(super) fn rounds_layout(report: &BenchmarkReport) -> (Vec<Column>, Vec<RowData>) {
    let phase_names: Vec<String> = report
        .rounds
        .first()
        .map(|m| m.phases.iter().map(|p| p.name.clone()).collect())
        .unwrap_or_default();

    let mut columns = vec![
        Column::new("Round", Alignment::Right),
        Column::new("Total", Alignment::Right),
    ];
    columns.extend(phase_names.iter().map(|name| Column::new(name, Alignment::Right)));

    let rows = report
        .rounds
        .iter()
        .enumerate()
        .map(|(idx, measurement)| {
            let mut row = vec![(idx + 1).to_string(), format_duration(measurement.total_secs())];
            for name in &phase_names {
                let cell = measurement
                    .phase(name)
                    .map(|p| format_duration(p.elapsed.as_secs_f64()))
                    .unwrap_or_else(|| "-".to_string());
                row.push(cell);
            }
            row
        })
        .collect();

    (columns, rows)
}

/// Connection detail rows shared by the plain and colored formatters
pub(super) fn echo_rows(exchange: &EchoExchange) -> Vec<RowData> {
    let states: Vec<String> = exchange.states.iter().map(|s| s.to_string()).collect();
    vec![
        vec!["States".to_string(), states.join(" -> ")],
        vec!["Sent".to_string(), format!("{} bytes", exchange.sent.len())],
        vec!["Received".to_string(), format!("{} bytes", exchange.received.len())],
        vec!["Connect".to_string(), format_duration(exchange.connect_time.as_secs_f64())],
        vec!["Round trip".to_string(), format_duration(exchange.round_trip.as_secs_f64())],
        vec!["Echoed".to_string(), if exchange.is_echo() { "yes" } else { "no" }.to_string()],
    ]
}

fn fmt_err(e: std::fmt::Error) -> AppError {
    AppError::io(format!("Failed to format output: {}", e))
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    fn key_value_format(&self) -> TableFormat {
        TableFormat {
            columns: vec![Column::new("Metric", Alignment::Left), Column::new("Value", Alignment::Right)],
            show_borders: self.options.table_borders,
            show_header: true,
        }
    }

    /// Create a table with the given format and data
    pub(super) fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let column_widths = self.calculate_column_widths(format, rows);
        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &column_widths, format));
            output.push('\n');

            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }
        }

        for row in rows {
            output.push_str(&self.create_row(row, &column_widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&column_widths));
        }

        output
    }

    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        let num_columns = format
            .columns
            .len()
            .max(rows.iter().map(|r| r.len()).max().unwrap_or(0));

        (0..num_columns)
            .map(|col_idx| {
                let column = format.columns.get(col_idx);
                let mut width = column
                    .map(|c| c.min_width.max(c.header.chars().count()))
                    .unwrap_or(4);

                for row in rows {
                    if let Some(cell) = row.get(col_idx) {
                        width = width.max(cell.chars().count());
                    }
                }

                width.min(column.map(|c| c.max_width).unwrap_or(self.options.max_width))
            })
            .collect()
    }

    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = format
                .columns
                .get(idx)
                .map(|c| &c.alignment)
                .unwrap_or(&Alignment::Left);

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&align_text(cell, width, alignment));
            if format.show_borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::new();

        if !widths.is_empty() {
            border.push('+');
            for &width in widths {
                border.push_str(&"-".repeat(width + 2));
                border.push('+');
            }
        }

        border
    }
}

/// Align text within specified width, counting characters, not bytes
pub(super) fn align_text(text: &str, width: usize, alignment: &Alignment) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }

    let padding = width - len;
    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left_pad = padding / 2;
            let right_pad = padding - left_pad;
            format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
        }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.chars().count() + 4);

        writeln!(output, "{}", border).map_err(fmt_err)?;
        writeln!(output, "  {}  ", title).map_err(fmt_err)?;
        write!(output, "{}", border).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_report_summary(&self, report: &BenchmarkReport, analysis: &ExtendedStatistics) -> Result<String> {
        let mut output = self.create_table(&self.key_value_format(), &summary_rows(report, analysis));
        if analysis.noisy {
            output.push('\n');
            output.push_str(&self.format_warning(&format!(
                "Rounds vary by {:.1}% of the mean; results may be noisy",
                analysis.coefficient_of_variation * 100.0
            ))?);
        }
        Ok(output)
    }

    fn format_rounds_table(&self, report: &BenchmarkReport) -> Result<String> {
        let (columns, rows) = rounds_layout(report);
        let format = TableFormat {
            columns,
            show_borders: self.options.table_borders,
            show_header: true,
        };
        Ok(self.create_table(&format, &rows))
    }

    fn format_echo_details(&self, exchange: &EchoExchange) -> Result<String> {
        Ok(self.create_table(&self.key_value_format(), &echo_rows(exchange)))
    }

    fn format_chart(&self, chart: &BarChart) -> Result<String> {
        let mut output = String::new();
        let layout = chart.layout(self.options.max_width.saturating_sub(40).max(10));
        let label_width = layout.iter().map(|row| row.label.chars().count()).max().unwrap_or(0);

        for (idx, row) in layout.iter().enumerate() {
            if idx > 0 && row.series_index == 0 {
                writeln!(output).map_err(fmt_err)?;
            }
            let glyph = if row.series_index % 2 == 0 { '#' } else { '=' };
            writeln!(
                output,
                "{} | {} {:.2}",
                align_text(&row.label, label_width, &Alignment::Left),
                glyph.to_string().repeat(row.bar_len),
                row.value_ms
            )
            .map_err(fmt_err)?;
        }

        writeln!(output).map_err(fmt_err)?;
        writeln!(output, "x: {}", chart.x_label()).map_err(fmt_err)?;
        writeln!(output, "y: {} (ticks {})", chart.y_label(), chart.tick_summary()).map_err(fmt_err)?;
        let legend: Vec<String> = chart
            .series()
            .iter()
            .enumerate()
            .map(|(idx, s)| format!("{} {}", if idx % 2 == 0 { '#' } else { '=' }, s.label))
            .collect();
        write!(output, "legend: {}", legend.join("  ")).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("OK: {}", message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Measurement, Phase};
    use crate::stats::StatisticsEngine;
    use crate::types::{TimedUnit, WorkloadKind};
    use std::time::Duration;

    fn plain() -> PlainFormatter {
        PlainFormatter::new(FormattingOptions { enable_color: false, ..Default::default() })
    }

    fn sort_report() -> BenchmarkReport {
        let mut report = BenchmarkReport::new(WorkloadKind::Sort, TimedUnit::Run, 1_000);
        for ms in [10, 12] {
            report.add_round(Measurement::from_phases(vec![
                Phase::new("fill", Duration::from_millis(ms)),
                Phase::new("sort", Duration::from_millis(ms * 3)),
            ]));
        }
        report.finalize();
        report
    }

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(0.000_000_5), "500ns");
        assert_eq!(format_duration(0.000_250), "250.00µs");
        assert_eq!(format_duration(0.125), "125.000ms");
        assert_eq!(format_duration(2.5), "2.500s");
    }

    #[test]
    fn test_align_text() {
        assert_eq!(align_text("ab", 4, &Alignment::Left), "ab  ");
        assert_eq!(align_text("ab", 4, &Alignment::Right), "  ab");
        assert_eq!(align_text("ab", 4, &Alignment::Center), " ab ");
        assert_eq!(align_text("abcdef", 3, &Alignment::Left), "abc");
    }

    #[test]
    fn test_header() {
        let header = plain().format_header("regex").unwrap();
        assert_eq!(header, "=========\n  regex  \n=========");
    }

    #[test]
    fn test_rounds_table_has_phase_columns() {
        let table = plain().format_rounds_table(&sort_report()).unwrap();
        assert!(table.contains("fill"));
        assert!(table.contains("sort"));
        assert!(table.contains("40.000ms"));
        assert!(table.contains("48.000ms"));
        assert_eq!(table.lines().count(), 6);
    }

    #[test]
    fn test_summary_for_run_workload_has_no_throughput() {
        let report = sort_report();
        let analysis = StatisticsEngine::with_defaults().analyze(&report).unwrap();
        let summary = plain().format_report_summary(&report, &analysis).unwrap();

        assert!(summary.contains("Mean"));
        assert!(summary.contains("p50"));
        assert!(!summary.contains("Throughput"));
    }

    #[test]
    fn test_summary_for_operation_workload() {
        let mut report = BenchmarkReport::new(WorkloadKind::Base64, TimedUnit::Operation, 1_000_000);
        report.add_round(Measurement { total: Duration::from_millis(100), phases: Vec::new() });
        report.finalize();
        let analysis = StatisticsEngine::with_defaults().analyze(&report).unwrap();
        let summary = plain().format_report_summary(&report, &analysis).unwrap();

        assert!(summary.contains("100.0ns"));
        assert!(summary.contains("10000000 ops/s"));
    }

    #[test]
    fn test_empty_table() {
        let format = TableFormat { columns: vec![], show_borders: true, show_header: true };
        assert!(plain().create_table(&format, &[]).is_empty());
    }
}
