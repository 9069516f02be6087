//! Structured logging for benchmark runs and echo exchanges
//!
//! Every entry goes to stderr so stdout carries only benchmark results and
//! echoed text. Entries are leveled, carry structured fields and can be
//! correlated through an operation id.

use crate::error::{AppError, Result};
use crate::models::{BenchmarkReport, Config, Measurement};
use crate::types::{ConnectionState, TimedUnit, WorkloadKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - detailed information for debugging
    Debug = 1,
    /// Info level - general application information
    Info = 2,
    /// Warning level - potentially harmful situations
    Warn = 3,
    /// Error level - the current command failed
    Error = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
        }
    }

    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// One structured log record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Logger name, e.g. `BENCH` or `NET`
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    pub fields: HashMap<String, serde_json::Value>,
    pub location: Option<LogLocation>,
}

/// Source code location information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    pub file: String,
    pub line: u32,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// One JSON object per line
    Json,
}

/// Context shared by clones of a logger
#[derive(Debug, Default)]
struct LogContext {
    session_id: Option<String>,
    current_correlation_id: Option<String>,
}

/// Leveled logger writing to stderr
#[derive(Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    include_location: bool,
    format: LogFormat,
    name: String,
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    pub fn new(name: &str) -> Self {
        Self {
            min_level: LogLevel::Warn,
            use_color: false,
            include_location: false,
            format: LogFormat::Console,
            name: name.to_string(),
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger whose level and format follow the configuration.
    ///
    /// `--debug` selects debug level with JSON lines, `--verbose` selects
    /// info, and the default is warn. An explicit `log_level` wins over both.
    pub fn with_config(name: &str, config: &Config) -> Self {
        let derived = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };
        let min_level = config
            .log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or(derived);

        Self {
            min_level,
            use_color: config.enable_color,
            include_location: config.debug,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name: name.to_string(),
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn level(&self) -> LogLevel {
        self.min_level
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn set_session_id(&self, session_id: String) {
        self.context.write().await.session_id = Some(session_id);
    }

    /// Start a correlated operation and return its id
    pub async fn start_operation(&self, operation_name: &str) -> String {
        let correlation_id = Uuid::new_v4().to_string();
        self.context.write().await.current_correlation_id = Some(correlation_id.clone());

        self.debug(&format!("Started operation: {}", operation_name))
            .correlation_id(&correlation_id)
            .field("operation", operation_name)
            .log()
            .await;

        correlation_id
    }

    pub async fn end_operation(&self, correlation_id: &str, operation_name: &str, success: bool) {
        self.debug(&format!("Completed operation: {} (success: {})", operation_name, success))
            .correlation_id(correlation_id)
            .field("operation", operation_name)
            .field("success", success)
            .log()
            .await;

        let mut context = self.context.write().await;
        if context.current_correlation_id.as_deref() == Some(correlation_id) {
            context.current_correlation_id = None;
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn trace(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    async fn write_entry(&self, mut entry: LogEntry) {
        if !self.would_log(entry.level) {
            return;
        }

        {
            let context = self.context.read().await;
            if let Some(session_id) = &context.session_id {
                entry
                    .fields
                    .insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
            }
            if entry.correlation_id.is_none() {
                entry.correlation_id = context.current_correlation_id.clone();
            }
        }

        let output = self.render(&entry);
        let _ = writeln!(io::stderr(), "{}", output);
    }

    /// Render an entry in the configured format
    pub fn render(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.format_console(entry),
            LogFormat::Json => self.format_json(entry),
        }
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        if let Some(correlation_id) = &entry.correlation_id {
            let short: String = correlation_id.chars().take(8).collect();
            output.push_str(&format!(" [{}]", short));
        }

        if !entry.fields.is_empty() {
            // Sorted so console lines are stable between runs
            let mut fields: Vec<String> = entry.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            fields.sort();
            output.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        if self.include_location {
            if let Some(location) = &entry.location {
                output.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!(
                "{{\"error\": \"Failed to serialize log entry\", \"message\": {:?}}}",
                entry.message
            ),
        }
    }
}

/// Builder for a single log entry
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: HashMap::new(),
                location: None,
            },
        }
    }

    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    pub fn location(mut self, file: &str, line: u32) -> Self {
        self.entry.location = Some(LogLocation { file: file.to_string(), line });
        self
    }

    /// Attach the headline and phase durations of a measurement
    pub fn measurement(mut self, measurement: &Measurement) -> Self {
        self = self.field("total_secs", measurement.total_secs());
        for phase in &measurement.phases {
            self = self.field(&format!("{}_secs", phase.name), phase.elapsed.as_secs_f64());
        }
        self
    }

    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code())
    }

    /// Build the entry without writing it
    pub fn build(self) -> LogEntry {
        self.entry
    }

    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Logger for benchmark verification and timing events
pub struct BenchLogger {
    logger: Logger,
}

impl BenchLogger {
    pub fn new(config: &Config) -> Self {
        Self { logger: Logger::with_config("BENCH", config) }
    }

    pub fn from_logger(logger: Logger) -> Self {
        Self { logger }
    }

    /// Open a correlated operation for one benchmark run
    pub async fn begin_run(&self, kind: WorkloadKind) -> String {
        self.logger.start_operation(&format!("bench {}", kind)).await
    }

    pub async fn finish_run(&self, correlation_id: &str, kind: WorkloadKind, success: bool) {
        self.logger
            .end_operation(correlation_id, &format!("bench {}", kind), success)
            .await;
    }

    pub async fn log_verified(&self, kind: WorkloadKind, unit: TimedUnit, size: u64) {
        self.logger
            .debug(&format!("Verified {} workload", kind))
            .field("workload", kind.name())
            .field("unit", unit.as_str())
            .field("size", size)
            .log()
            .await;
    }

    pub async fn log_round(&self, kind: WorkloadKind, round: u32, measurement: &Measurement) {
        self.logger
            .debug(&format!("{} round {} took {:.6}s", kind, round, measurement.total_secs()))
            .field("workload", kind.name())
            .field("round", round)
            .measurement(measurement)
            .log()
            .await;
    }

    pub async fn log_report(&self, report: &BenchmarkReport) {
        let Some(stats) = &report.statistics else {
            self.logger
                .warn(&format!("{} benchmark finished without any rounds", report.workload))
                .field("workload", report.workload.name())
                .log()
                .await;
            return;
        };

        let mut builder = self
            .logger
            .info(&format!(
                "{} benchmark: {} round(s), mean {:.6}s",
                report.workload, stats.sample_count, stats.mean_secs
            ))
            .field("workload", report.workload.name())
            .field("unit", report.unit.as_str())
            .field("size", report.size)
            .field("rounds", stats.sample_count)
            .field("mean_secs", stats.mean_secs)
            .field("min_secs", stats.min_secs)
            .field("max_secs", stats.max_secs)
            .field("std_dev_secs", stats.std_dev_secs);

        if let Some(ns) = stats.ns_per_op {
            builder = builder.field("ns_per_op", ns);
        }

        builder.log().await;
    }
}

/// Logger for echo connection events
pub struct NetworkLogger {
    logger: Logger,
}

impl NetworkLogger {
    pub fn new(config: &Config) -> Self {
        Self { logger: Logger::with_config("NET", config) }
    }

    pub fn from_logger(logger: Logger) -> Self {
        Self { logger }
    }

    /// Open a correlated operation for one echo exchange
    pub async fn begin_exchange(&self, target: &str) -> String {
        self.logger.start_operation(&format!("echo {}", target)).await
    }

    pub async fn finish_exchange(&self, correlation_id: &str, target: &str, success: bool) {
        self.logger
            .end_operation(correlation_id, &format!("echo {}", target), success)
            .await;
    }

    pub async fn log_connection(&self, target: &str, success: bool, duration: Duration, error: Option<&str>) {
        let level = if success { LogLevel::Debug } else { LogLevel::Warn };
        let message = if success {
            format!("Connected to {}", target)
        } else {
            format!("Failed to connect to {}: {}", target, error.unwrap_or("unknown error"))
        };

        let mut builder = self
            .logger
            .log(level, &message)
            .field("target", target)
            .field("success", success)
            .field("duration_ms", duration.as_secs_f64() * 1000.0);

        if let Some(err) = error {
            builder = builder.field("error", err);
        }

        builder.log().await;
    }

    pub async fn log_transition(&self, from: ConnectionState, to: ConnectionState) {
        self.logger
            .trace(&format!("Connection state {} -> {}", from, to))
            .field("from", from.to_string())
            .field("to", to.to_string())
            .log()
            .await;
    }

    pub async fn log_exchange(&self, target: &str, sent: usize, received: usize, round_trip: Duration) {
        self.logger
            .info(&format!("Echo exchange with {}: sent {} bytes, received {} bytes", target, sent, received))
            .field("target", target)
            .field("sent_bytes", sent)
            .field("received_bytes", received)
            .field("round_trip_ms", round_trip.as_secs_f64() * 1000.0)
            .log()
            .await;
    }
}

/// Logger for command failures
pub struct ErrorEventLogger {
    logger: Logger,
}

impl ErrorEventLogger {
    pub fn new(config: &Config) -> Self {
        Self { logger: Logger::with_config("ERR", config) }
    }

    pub async fn log_error(&self, error: &AppError, context: Option<&str>) {
        let message = match context {
            Some(ctx) => format!("{}: {}", ctx, error),
            None => error.to_string(),
        };

        let mut builder = self.logger.error(&message).error_info(error);
        if let Some(ctx) = context {
            builder = builder.field("context", ctx);
        }
        builder.log().await;
    }
}

/// Creates loggers that share one session id
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    pub async fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name, &self.config);
        logger.set_session_id(self.session_id.clone()).await;
        logger
    }

    pub async fn create_bench_logger(&self) -> BenchLogger {
        BenchLogger::from_logger(self.create_logger("BENCH").await)
    }

    pub async fn create_network_logger(&self) -> NetworkLogger {
        NetworkLogger::from_logger(self.create_logger("NET").await)
    }

    pub fn create_error_logger(&self) -> ErrorEventLogger {
        ErrorEventLogger::new(&self.config)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Log at debug level with the call site attached
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
            .location(file!(), line!())
            .log()
            .await
    };
}
