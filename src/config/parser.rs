//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::{supports_color, Cli, Commands},
    config::env::EnvManager,
    error::Result,
    models::Config,
    types::WorkloadKind,
};
use std::path::PathBuf;

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
    env_file: PathBuf,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            env_file: PathBuf::from(".env"),
        }
    }

    /// Read the env file from `path` instead of `./.env`
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    /// Defaults, then the env file, then environment variables, then CLI flags
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file_from(&self.env_file, self.cli.debug)?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    /// Only flags the user actually passed replace lower layers
    fn apply_cli_overrides(&self, config: &mut Config) {
        match &self.cli.command {
            Some(Commands::Bench(args)) => {
                // `-n` is the fib depth for fib and the iteration count otherwise
                if args.iterations.is_some() {
                    if args.workload == WorkloadKind::Fib {
                        config.fib_depth = args.iterations;
                    } else {
                        config.iterations = args.iterations;
                    }
                }
                if let Some(rounds) = args.rounds {
                    config.rounds = rounds;
                }
                if args.seed.is_some() {
                    config.seed = args.seed;
                }
                config.json = args.json;
            }
            Some(Commands::Echo(args)) => {
                if let Some(host) = &args.host {
                    config.echo_host = host.clone();
                }
                if let Some(port) = args.port {
                    config.echo_port = port;
                }
                if let Some(message) = &args.message {
                    config.echo_message = message.clone();
                }
                if let Some(timeout) = args.timeout {
                    config.echo_timeout_seconds = timeout;
                }
            }
            Some(Commands::Chart) | None => {}
        }

        if self.cli.color {
            config.enable_color = true;
        } else if self.cli.no_color {
            config.enable_color = false;
        } else {
            config.enable_color = config.enable_color && supports_color();
        }

        // CLI-only
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!(
                "Final config: rounds={}, iterations={:?}, fib_depth={:?}, echo={}, enable_color={}",
                config.rounds,
                config.iterations,
                config.fib_depth,
                config.echo_address(),
                config.enable_color
            );
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    match config.iterations {
        Some(n) => summary.push(format!("Iterations: {}", n)),
        None => summary.push("Iterations: workload default".to_string()),
    }
    summary.push(format!("Fib depth: {}", config.size_for(WorkloadKind::Fib)));
    summary.push(format!("Rounds: {}", config.rounds));
    if let Some(seed) = config.seed {
        summary.push(format!("Seed: {}", seed));
    }
    summary.push(format!("Echo peer: {}", config.echo_address()));
    summary.push(format!("Echo message: {:?}", config.echo_message));
    summary.push(format!("Timeout: {}s", config.echo_timeout_seconds));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("JSON: {}", config.json));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
