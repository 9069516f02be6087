//! Output formatting and display system
//!
//! Benchmark headlines are always plain seconds, one line per round, so the
//! output stays scriptable. Colored or plain formatters only render the
//! verbose sections and the chart.

pub mod chart;
mod colored;
mod formatter;

pub use self::colored::{ColorScheme, ColoredFormatter};
pub use chart::BarChart;
pub use formatter::{
    format_duration, Alignment, Column, FormattingOptions, OutputFormatter, PlainFormatter, RowData, TableFormat,
};

use crate::{
    client::EchoExchange,
    error::Result,
    models::{BenchmarkReport, Config},
    stats::{ExtendedStatistics, StatisticsEngine},
};
use serde::Serialize;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            table_borders: true,
            max_width: 100,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Plain text formatter for scripts and logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, true)
    }
}

/// `--json` document for one benchmark
#[derive(Debug, Serialize)]
struct BenchJson<'a> {
    report: &'a BenchmarkReport,
    analysis: Option<ExtendedStatistics>,
}

/// Main output coordinator for every command
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    verbose: bool,
    json: bool,
}

impl OutputCoordinator {
    pub fn new(formatter: Box<dyn OutputFormatter>) -> Self {
        Self {
            formatter,
            verbose: false,
            json: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            formatter: OutputFormatterFactory::create_formatter(config.enable_color, config.verbose),
            verbose: config.verbose,
            json: config.json,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn formatter(&self) -> &dyn OutputFormatter {
        self.formatter.as_ref()
    }

    /// Elapsed seconds of every round, one per line
    pub fn headline(&self, report: &BenchmarkReport) -> String {
        report
            .round_secs()
            .iter()
            .map(|secs| secs.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Everything printed to stdout for a finished benchmark
    pub fn render_bench(&self, report: &BenchmarkReport) -> Result<String> {
        let analysis = if report.statistics.is_some() {
            Some(StatisticsEngine::with_defaults().analyze(report)?)
        } else {
            None
        };

        if self.json {
            let doc = BenchJson { report, analysis };
            return Ok(serde_json::to_string_pretty(&doc)?);
        }

        let mut output = self.headline(report);

        if self.verbose {
            if let Some(analysis) = &analysis {
                output.push_str("\n\n");
                output.push_str(&self.formatter.format_header(&format!("{} benchmark", report.workload))?);
                output.push('\n');
                output.push_str(&self.formatter.format_rounds_table(report)?);
                output.push_str("\n\n");
                output.push_str(&self.formatter.format_report_summary(report, analysis)?);
            }
        }

        Ok(output)
    }

    /// Decoded text, then the raw-bytes line
    pub fn render_echo(&self, exchange: &EchoExchange) -> Result<String> {
        let mut output = format!("{}\nReceived {}", exchange.text, exchange.received_repr());

        if self.verbose {
            output.push_str("\n\n");
            output.push_str(&self.formatter.format_echo_details(exchange)?);
        }

        Ok(output)
    }

    pub fn render_chart(&self, chart: &BarChart) -> Result<String> {
        let mut output = self.formatter.format_header("Python vs Boson")?;
        output.push('\n');
        output.push_str(&self.formatter.format_chart(chart)?);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Measurement, Phase};
    use crate::types::{ConnectionState, TimedUnit, WorkloadKind};
    use std::time::Duration;

    fn plain_coordinator() -> OutputCoordinator {
        OutputCoordinator::new(OutputFormatterFactory::create_plain_formatter())
    }

    fn report(rounds: &[u64]) -> BenchmarkReport {
        let mut report = BenchmarkReport::new(WorkloadKind::Sort, TimedUnit::Run, 100);
        for &ms in rounds {
            report.add_round(Measurement::from_phases(vec![
                Phase::new("fill", Duration::from_millis(ms)),
                Phase::new("sort", Duration::from_millis(ms)),
            ]));
        }
        report.finalize();
        report
    }

    #[test]
    fn test_headline_is_one_number_per_round() {
        let output = plain_coordinator().render_bench(&report(&[250, 500])).unwrap();
        assert_eq!(output, "0.5\n1");
    }

    #[test]
    fn test_verbose_adds_tables() {
        let output = plain_coordinator().with_verbose(true).render_bench(&report(&[250])).unwrap();
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("0.5"));
        assert!(output.contains("sort benchmark"));
        assert!(output.contains("Mean"));
    }

    #[test]
    fn test_json_output() {
        let output = plain_coordinator().with_json(true).render_bench(&report(&[250])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["report"]["workload"], "sort");
        assert_eq!(value["report"]["unit"], "run");
        assert_eq!(value["report"]["rounds"][0]["total"], serde_json::json!(0.5));
        assert!(value["analysis"]["percentiles"]["p50"].is_number());
    }

    #[test]
    fn test_echo_lines() {
        let exchange = EchoExchange {
            sent: b"Hello, world".to_vec(),
            received: b"Hello, world".to_vec(),
            text: "Hello, world".to_string(),
            states: vec![ConnectionState::Disconnected, ConnectionState::Closed],
            connect_time: Duration::ZERO,
            round_trip: Duration::ZERO,
        };
        let output = plain_coordinator().render_echo(&exchange).unwrap();
        assert_eq!(output, "Hello, world\nReceived b'Hello, world'");
    }

    #[test]
    fn test_chart_render() {
        let chart = BarChart::comparison().unwrap();
        let output = plain_coordinator().render_chart(&chart).unwrap();
        assert!(output.contains("Python vs Boson"));
        assert!(output.contains("Time taken (ms)"));
        assert!(output.contains("0, 1000, ..., 29000"));
    }
}
