//! Environment variable handling and .env file management

use crate::config::validation::{ValidationLevel, ValidationWarning};
use crate::error::{AppError, Result};
use crate::logging::LogLevel;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load `.env` from the working directory if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load an env file if it exists. Variables already set in the process
    /// environment are left untouched.
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# boson-bench configuration
#
# Values here act as defaults; environment variables and command line
# flags take precedence.

# Repetitions (base64, regex) or element count (sort)
BENCH_ITERATIONS=1000000

# Recursion depth for fib (0-93)
BENCH_FIB_DEPTH=30

# How many times each benchmark is measured (1-100)
BENCH_ROUNDS=1

# Seed for the sort workload's random values
# BENCH_SEED=42

# Echo peer
ECHO_HOST=127.0.0.1
ECHO_PORT=9000
ECHO_MESSAGE="Hello, world"

# Connect and read timeout in seconds (1-300)
ECHO_TIMEOUT_SECONDS=10

# Enable colored output (true/false)
ENABLE_COLOR=true

# Log level override (trace, debug, info, warn, error)
# LOG_LEVEL=info
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        std::fs::write(path, Self::create_example_env_content())
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "BENCH_FIB_DEPTH" => {
                let depth: u64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid BENCH_FIB_DEPTH value '{}': {}", value, e)))?;
                if depth > crate::workloads::fib::MAX_FIB_DEPTH {
                    return Err(AppError::config(format!(
                        "BENCH_FIB_DEPTH cannot exceed {}, got: {}",
                        crate::workloads::fib::MAX_FIB_DEPTH,
                        depth
                    )));
                }
            }
            "BENCH_ITERATIONS" | "BENCH_SEED" => {
                value
                    .parse::<u64>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            "BENCH_ROUNDS" => {
                let rounds: u32 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid BENCH_ROUNDS value '{}': {}", value, e)))?;
                if rounds == 0 || rounds > crate::defaults::MAX_ROUNDS {
                    return Err(AppError::config(format!(
                        "BENCH_ROUNDS must be between 1 and {}, got: {}",
                        crate::defaults::MAX_ROUNDS,
                        rounds
                    )));
                }
            }
            "ECHO_HOST" => {
                if value.is_empty() {
                    return Err(AppError::config("ECHO_HOST cannot be empty"));
                }
            }
            "ECHO_PORT" => {
                let port: u16 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid ECHO_PORT value '{}': {}", value, e)))?;
                if port == 0 {
                    return Err(AppError::config("ECHO_PORT must be between 1 and 65535"));
                }
            }
            "ECHO_TIMEOUT_SECONDS" => {
                let timeout: u64 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid ECHO_TIMEOUT_SECONDS value '{}': {}", value, e))
                })?;
                if timeout == 0 || timeout > 300 {
                    return Err(AppError::config(format!(
                        "ECHO_TIMEOUT_SECONDS must be between 1 and 300, got: {}",
                        timeout
                    )));
                }
            }
            "ENABLE_COLOR" => {
                value
                    .parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            "LOG_LEVEL" => {
                value
                    .parse::<LogLevel>()
                    .map_err(|_| AppError::config(format!("Invalid LOG_LEVEL value '{}'", value)))?;
            }
            _ => {}
        }

        Ok(())
    }

    /// All supported environment variables as (name, description, example)
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("BENCH_ITERATIONS", "Repetitions (base64, regex) or element count (sort)", "1000000"),
            ("BENCH_FIB_DEPTH", "Recursion depth for fib (0-93)", "30"),
            ("BENCH_ROUNDS", "Measurements per benchmark (1-100)", "5"),
            ("BENCH_SEED", "Seed for the sort workload", "42"),
            ("ECHO_HOST", "Echo peer host", "127.0.0.1"),
            ("ECHO_PORT", "Echo peer port (1-65535)", "9000"),
            ("ECHO_MESSAGE", "Message sent to the echo peer (at most 1024 bytes)", "Hello, world"),
            ("ECHO_TIMEOUT_SECONDS", "Connect and read timeout in seconds (1-300)", "10"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
            ("LOG_LEVEL", "Log level override", "info"),
        ]
    }

    /// Check every supported variable currently set; each bad value is an error-level entry
    pub fn validate_current_env() -> Vec<ValidationWarning> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(name, _, _)| std::env::var(name).ok().map(|value| (name, value)))
            .filter_map(|(name, value)| Self::validate_env_var(name, &value).err())
            .map(|e| ValidationWarning::new(ValidationLevel::Error, e.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_LOCK;
    use tempfile::TempDir;

    fn clear_supported_vars() {
        for (name, _, _) in EnvManager::get_supported_env_vars() {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_validate_env_var() {
        assert!(EnvManager::validate_env_var("BENCH_ITERATIONS", "0").is_ok());
        assert!(EnvManager::validate_env_var("BENCH_ITERATIONS", "-1").is_err());
        assert!(EnvManager::validate_env_var("BENCH_ROUNDS", "100").is_ok());
        assert!(EnvManager::validate_env_var("BENCH_ROUNDS", "101").is_err());
        assert!(EnvManager::validate_env_var("ECHO_PORT", "0").is_err());
        assert!(EnvManager::validate_env_var("ECHO_PORT", "65536").is_err());
        assert!(EnvManager::validate_env_var("ECHO_PORT", " 9000 ").is_ok());
        assert!(EnvManager::validate_env_var("ECHO_TIMEOUT_SECONDS", "301").is_err());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "yes").is_err());
        assert!(EnvManager::validate_env_var("LOG_LEVEL", "warning").is_ok());
        assert!(EnvManager::validate_env_var("ECHO_HOST", "  ").is_err());
        assert!(EnvManager::validate_env_var("UNRELATED", "anything").is_ok());
    }

    #[test]
    fn test_example_file_loads_through_dotenv() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_supported_vars();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        EnvManager::save_example_env_file(&path).unwrap();
        EnvManager::load_env_file_from(&path, false).unwrap();

        assert_eq!(std::env::var("ECHO_MESSAGE").unwrap(), "Hello, world");
        assert_eq!(std::env::var("BENCH_FIB_DEPTH").unwrap(), "30");
        assert!(EnvManager::validate_current_env().is_empty());

        let mut config = crate::models::Config::default();
        config.merge_from_env().unwrap();
        config.validate().unwrap();
        assert_eq!(config.size_for(crate::types::WorkloadKind::Fib), 30);

        clear_supported_vars();
    }

    #[test]
    fn test_validate_current_env_reports_errors() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_supported_vars();

        std::env::set_var("ECHO_PORT", "0");
        std::env::set_var("BENCH_FIB_DEPTH", "200");
        let issues = EnvManager::validate_current_env();
        clear_supported_vars();

        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|w| w.level == ValidationLevel::Error));
        assert!(issues.iter().any(|w| w.message.contains("ECHO_PORT")));
    }

    #[test]
    fn test_save_example_env_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env.example");
        EnvManager::save_example_env_file(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("ECHO_PORT=9000"));
    }

    #[test]
    fn test_missing_env_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(EnvManager::load_env_file_from(&dir.path().join("absent.env"), false).is_ok());
    }

    #[test]
    fn test_supported_vars_have_examples() {
        for (name, description, example) in EnvManager::get_supported_env_vars() {
            assert!(!description.is_empty());
            assert!(EnvManager::validate_env_var(name, example).is_ok(), "{}", name);
        }
    }
}
