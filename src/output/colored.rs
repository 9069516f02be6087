//! Colored formatter implementation with terminal color support

use super::chart::BarChart;
use super::formatter::{
    align_text, echo_rows, rounds_layout, summary_rows, Alignment, FormattingOptions, OutputFormatter,
    PlainFormatter, RowData, TableFormat,
};
use crate::{
    client::EchoExchange,
    error::{AppError, Result},
    models::BenchmarkReport,
    stats::ExtendedStatistics,
};
use colored::*;
use std::fmt::Write as _;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
    pub border: Color,
    /// Bar colors, cycled per chart series
    pub series: Vec<Color>,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
            border: Color::BrightBlack,
            series: vec![Color::Blue, Color::Yellow],
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        let plain_formatter = PlainFormatter::new(options.clone());
        Self {
            plain_formatter,
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn series_color(&self, index: usize) -> Color {
        if self.color_scheme.series.is_empty() {
            self.color_scheme.info
        } else {
            self.color_scheme.series[index % self.color_scheme.series.len()]
        }
    }

    /// Two-column key/value block with colored keys
    fn key_value_block(&self, rows: &[RowData]) -> Result<String> {
        let key_width = rows.iter().filter_map(|r| r.first()).map(|k| k.chars().count()).max().unwrap_or(0);
        let mut output = String::new();

        for (idx, row) in rows.iter().enumerate() {
            if idx > 0 {
                output.push('\n');
            }
            let key = row.first().map(String::as_str).unwrap_or("");
            let value = row.get(1).map(String::as_str).unwrap_or("");
            // Pad before coloring so escape codes don't skew the alignment
            let padded = align_text(key, key_width, &Alignment::Left);
            write!(output, "  {}  {}", self.colorize(&padded, self.color_scheme.info), self.bold(value))
                .map_err(fmt_err)?;
        }

        Ok(output)
    }
}

fn fmt_err(e: std::fmt::Error) -> AppError {
    AppError::io(format!("Failed to format output: {}", e))
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "═".repeat(title.chars().count() + 4);

        writeln!(output, "{}", self.colorize(&border, self.color_scheme.border)).map_err(fmt_err)?;
        writeln!(output, "  {}  ", self.colorize(title, self.color_scheme.header)).map_err(fmt_err)?;
        write!(output, "{}", self.colorize(&border, self.color_scheme.border)).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_report_summary(&self, report: &BenchmarkReport, analysis: &ExtendedStatistics) -> Result<String> {
        let mut output = self.key_value_block(&summary_rows(report, analysis))?;
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
        let table = self.plain_formatter.create_table(&format, &rows);

        // Borders muted, everything else as-is
        let colored: Vec<String> = table
            .lines()
            .map(|line| {
                if line.starts_with('+') {
                    self.colorize(line, self.color_scheme.border).to_string()
                } else {
                    line.to_string()
                }
            })
            .collect();
        Ok(colored.join("\n"))
    }

    fn format_echo_details(&self, exchange: &EchoExchange) -> Result<String> {
        let mut output = self.key_value_block(&echo_rows(exchange))?;
        if !exchange.is_echo() {
            output.push('\n');
            output.push_str(&self.format_warning("Reply differs from the message sent")?);
        }
        Ok(output)
    }

    fn format_chart(&self, chart: &BarChart) -> Result<String> {
        let mut output = String::new();
        let layout = chart.layout(self.options.max_width.saturating_sub(40).max(10));
        let label_width = layout.iter().map(|row| row.label.chars().count()).max().unwrap_or(0);

        for (idx, row) in layout.iter().enumerate() {
            if idx > 0 && row.series_index == 0 {
                writeln!(output).map_err(fmt_err)?;
            }
            let bar = "█".repeat(row.bar_len);
            writeln!(
                output,
                "{} {} {} {}",
                align_text(&row.label, label_width, &Alignment::Left),
                self.colorize("│", self.color_scheme.border),
                self.colorize(&bar, self.series_color(row.series_index)),
                self.colorize(&format!("{:.2}", row.value_ms), self.color_scheme.muted)
            )
            .map_err(fmt_err)?;
        }

        writeln!(output).map_err(fmt_err)?;
        writeln!(output, "{} {}", self.bold("x:"), chart.x_label()).map_err(fmt_err)?;
        writeln!(output, "{} {} (ticks {})", self.bold("y:"), chart.y_label(), chart.tick_summary())
            .map_err(fmt_err)?;
        let legend: Vec<String> = chart
            .series()
            .iter()
            .enumerate()
            .map(|(idx, s)| format!("{} {}", self.colorize("█", self.series_color(idx)), s.label))
            .collect();
        write!(output, "{} {}", self.bold("legend:"), legend.join("  ")).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("✗", self.color_scheme.error), self.colorize(error, self.color_scheme.error)))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("!", self.color_scheme.warning), self.colorize(warning, self.color_scheme.warning)))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("✓", self.color_scheme.success), self.colorize(message, self.color_scheme.success)))
    }
}
