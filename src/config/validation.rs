//! Advisory configuration checks that go beyond hard validation

use crate::{
    cli::Commands,
    error::Result,
    models::Config,
    types::WorkloadKind,
};
use colored::*;
use std::net::IpAddr;

/// Operation counts above this make a single round take very long
const LARGE_ITERATIONS: u64 = 100_000_000;
/// Sort arrays above this need several hundred MB
const LARGE_SORT_LEN: u64 = 50_000_000;
/// Recursive fib beyond this depth takes minutes
const SLOW_FIB_DEPTH: u64 = 40;

/// Configuration validator with advisory rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Run hard validation, then collect warnings for the settings `command` uses
    pub fn validate_comprehensive(config: &Config, command: Option<&Commands>) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        match command {
            Some(Commands::Bench(args)) => {
                warnings.extend(Self::validate_workload_size(config, args.workload));
                warnings.extend(Self::validate_rounds(config));
            }
            Some(Commands::Echo(_)) => warnings.extend(Self::validate_echo_settings(config)),
            Some(Commands::Chart) | None => {}
        }
        Ok(warnings)
    }

    fn validate_workload_size(config: &Config, kind: WorkloadKind) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let size = config.size_for(kind);

        match kind {
            WorkloadKind::Base64 | WorkloadKind::Regex => {
                if size == 0 {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        format!("{} with 0 iterations measures only the loop itself", kind),
                    ));
                } else if size > LARGE_ITERATIONS {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Warning,
                        format!("{} iterations of {} may take a long time", size, kind),
                    ));
                }
            }
            WorkloadKind::Sort => {
                if size > LARGE_SORT_LEN {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Warning,
                        format!(
                            "sorting {} floats needs about {} MB",
                            size,
                            size.saturating_mul(8) / (1024 * 1024)
                        ),
                    ));
                }
            }
            WorkloadKind::Fib => {
                if size > SLOW_FIB_DEPTH {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Warning,
                        format!("recursive fib({}) grows exponentially and may not finish soon", size),
                    ));
                }
            }
        }

        if kind != WorkloadKind::Sort && config.seed.is_some() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("--seed has no effect on the {} workload", kind),
            ));
        }

        warnings
    }

    fn validate_rounds(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        if config.rounds == 1 && config.verbose {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "A single round gives no spread; use --rounds 3 or more for stable statistics".to_string(),
            ));
        } else if config.rounds > 20 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("{} rounds will multiply the run time accordingly", config.rounds),
            ));
        }
        warnings
    }

    fn validate_echo_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if !Self::is_loopback_host(&config.echo_host) {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Echo host {} is not a loopback address", config.echo_host),
            ));
        }

        if config.echo_timeout_seconds < 2 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Timeout of {}s may be too short for a slow peer", config.echo_timeout_seconds),
            ));
        }

        if config.echo_port < 1024 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Port {} is in the privileged range", config.echo_port),
            ));
        }

        warnings
    }

    fn is_loopback_host(host: &str) -> bool {
        let host = host.trim_start_matches('[').trim_end_matches(']');
        host.eq_ignore_ascii_case("localhost")
            || host.parse::<IpAddr>().map(|ip| ip.is_loopback()).unwrap_or(false)
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    pub fn format(&self, use_color: bool) -> String {
        if use_color {
            format!("[{}] {}", self.level.as_str().color(self.level.color()).bold(), self.message)
        } else {
            format!("[{}] {}", self.level.as_str(), self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config, command: Option<&Commands>) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config, command)
}
