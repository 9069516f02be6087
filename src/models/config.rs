//! Configuration data model and validation

use crate::types::{AppError, Result, WorkloadKind};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Repetitions (or element count) override; `None` uses the workload default
    #[serde(default)]
    pub iterations: Option<u64>,

    /// Recursion depth for the fib workload, kept apart from `iterations`
    #[serde(default)]
    pub fib_depth: Option<u64>,

    /// How many times the whole benchmark is measured
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// Seed for the sort workload's random number generator
    #[serde(default)]
    pub seed: Option<u64>,

    /// Echo peer hostname or IP literal
    #[serde(default = "default_echo_host")]
    pub echo_host: String,

    /// Echo peer TCP port
    #[serde(default = "default_echo_port")]
    pub echo_port: u16,

    /// Message sent by the echo client
    #[serde(default = "default_echo_message")]
    pub echo_message: String,

    /// Connect and read timeout for the echo client
    #[serde(default = "default_echo_timeout_secs")]
    pub echo_timeout_seconds: u64,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Emit the benchmark report as JSON
    #[serde(default)]
    pub json: bool,

    /// Explicit log level override (trace, debug, info, warn, error)
    #[serde(default)]
    pub log_level: Option<String>,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: None,
            fib_depth: None,
            rounds: default_rounds(),
            seed: None,
            echo_host: default_echo_host(),
            echo_port: default_echo_port(),
            echo_message: default_echo_message(),
            echo_timeout_seconds: default_echo_timeout_secs(),
            enable_color: default_enable_color(),
            json: false,
            log_level: None,
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get echo timeout as Duration
    pub fn echo_timeout(&self) -> Duration {
        Duration::from_secs(self.echo_timeout_seconds)
    }

    /// `host:port` of the echo peer
    pub fn echo_address(&self) -> String {
        if self.echo_host.contains(':') && !self.echo_host.starts_with('[') {
            // Bare IPv6 literal
            format!("[{}]:{}", self.echo_host, self.echo_port)
        } else {
            format!("{}:{}", self.echo_host, self.echo_port)
        }
    }

    /// Size used for a workload, after applying the override
    pub fn size_for(&self, kind: WorkloadKind) -> u64 {
        let value = match kind {
            WorkloadKind::Fib => self.fib_depth,
            _ => self.iterations,
        };
        value.unwrap_or_else(|| kind.default_size())
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(AppError::config("Rounds must be greater than 0"));
        }

        if self.rounds > crate::defaults::MAX_ROUNDS {
            return Err(AppError::config(format!(
                "Rounds cannot exceed {}",
                crate::defaults::MAX_ROUNDS
            )));
        }

        if self.echo_host.trim().is_empty() {
            return Err(AppError::config("Echo host cannot be empty"));
        }

        if self.echo_port == 0 {
            return Err(AppError::config("Echo port must be between 1 and 65535"));
        }

        if self.echo_message.is_empty() {
            return Err(AppError::config("Echo message cannot be empty"));
        }

        if self.echo_message.len() > crate::defaults::ECHO_RECV_BUFFER {
            return Err(AppError::config(format!(
                "Echo message cannot exceed {} bytes",
                crate::defaults::ECHO_RECV_BUFFER
            )));
        }

        if self.echo_timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.echo_timeout_seconds > 300 {
            return Err(AppError::config("Timeout cannot exceed 300 seconds"));
        }

        if let Some(level) = &self.log_level {
            level.parse::<crate::logging::LogLevel>()
                .map_err(|_| AppError::config(format!("Invalid log level: {}", level)))?;
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(iterations) = std::env::var("BENCH_ITERATIONS") {
            self.iterations = Some(iterations.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid BENCH_ITERATIONS value '{}': {}", iterations, e)))?);
        }

        if let Ok(depth) = std::env::var("BENCH_FIB_DEPTH") {
            self.fib_depth = Some(depth.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid BENCH_FIB_DEPTH value '{}': {}", depth, e)))?);
        }

        if let Ok(rounds) = std::env::var("BENCH_ROUNDS") {
            self.rounds = rounds.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid BENCH_ROUNDS value '{}': {}", rounds, e)))?;
        }

        if let Ok(seed) = std::env::var("BENCH_SEED") {
            self.seed = Some(seed.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid BENCH_SEED value '{}': {}", seed, e)))?);
        }

        if let Ok(host) = std::env::var("ECHO_HOST") {
            self.echo_host = host.trim().to_string();
        }

        if let Ok(port) = std::env::var("ECHO_PORT") {
            self.echo_port = port.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ECHO_PORT value '{}': {}", port, e)))?;
        }

        if let Ok(message) = std::env::var("ECHO_MESSAGE") {
            self.echo_message = message;
        }

        if let Ok(timeout) = std::env::var("ECHO_TIMEOUT_SECONDS") {
            self.echo_timeout_seconds = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ECHO_TIMEOUT_SECONDS value '{}': {}", timeout, e)))?;
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.log_level = Some(level.trim().to_string());
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_rounds() -> u32 {
    crate::defaults::DEFAULT_ROUNDS
}

fn default_echo_host() -> String {
    crate::defaults::DEFAULT_ECHO_HOST.to_string()
}

fn default_echo_port() -> u16 {
    crate::defaults::DEFAULT_ECHO_PORT
}

fn default_echo_message() -> String {
    crate::defaults::DEFAULT_ECHO_MESSAGE.to_string()
}

fn default_echo_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_ECHO_TIMEOUT.as_secs()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
