//! Command-line interface with subcommands and a topic help system

pub mod help;

pub use help::HelpSystem;

use crate::types::WorkloadKind;
use clap::{Args, Parser, Subcommand};

/// boson-bench - micro-benchmarks and a single-shot TCP echo client
#[derive(Parser, Debug, Clone)]
#[command(name = "boson-bench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Force colored output
    #[arg(long, global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Show help for specific topic (config, bench, echo, chart, examples)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Time a workload and print the elapsed seconds
    Bench(BenchArgs),
    /// Send one message to an echo peer and print the reply
    Echo(EchoArgs),
    /// Show the Python vs Boson comparison chart
    Chart,
}

#[derive(Args, Debug, Clone)]
pub struct BenchArgs {
    /// Workload to run
    #[arg(value_enum)]
    pub workload: WorkloadKind,

    /// Repetitions, element count or fib depth, depending on the workload
    #[arg(short = 'n', long)]
    pub iterations: Option<u64>,

    /// How many times the whole benchmark is measured
    #[arg(short, long)]
    pub rounds: Option<u32>,

    /// Seed for the sort workload's random values
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the report as JSON instead of plain seconds
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct EchoArgs {
    /// Echo peer host
    #[arg(long)]
    pub host: Option<String>,

    /// Echo peer port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Message to send
    #[arg(short, long)]
    pub message: Option<String>,

    /// Connect and read timeout in seconds
    #[arg(short, long, value_parser = parse_timeout)]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.command.is_none() && self.help_topic.is_none() {
            return Err("No command given; use bench, echo or chart (see --help)".to_string());
        }

        if let Some(Commands::Bench(args)) = &self.command {
            if args.rounds == Some(0) {
                return Err("--rounds must be at least 1".to_string());
            }
        }

        Ok(())
    }

    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Display help for the specified topic or main help
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();

        match &self.help_topic {
            Some(topic) => help_system.display_topic_help(topic, use_colors).unwrap_or_else(|| {
                format!(
                    "Unknown help topic: '{}'\n\nAvailable topics: {}\n\n{}",
                    topic,
                    HelpSystem::TOPICS.join(", "),
                    help_system.display_main_help(use_colors)
                )
            }),
            None => help_system.display_main_help(use_colors),
        }
    }

    /// Subcommand as typed, e.g. `bench fib`
    pub fn command_name(&self) -> String {
        match &self.command {
            Some(Commands::Bench(args)) => format!("bench {}", args.workload),
            Some(Commands::Echo(_)) => "echo".to_string(),
            Some(Commands::Chart) => "chart".to_string(),
            None => "none".to_string(),
        }
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Command Line Summary:\n");
        match &self.command {
            Some(Commands::Bench(args)) => {
                summary.push_str(&format!("  Command: bench {}\n", args.workload));
                if let Some(iterations) = args.iterations {
                    summary.push_str(&format!("  Iterations: {}\n", iterations));
                }
                if let Some(rounds) = args.rounds {
                    summary.push_str(&format!("  Rounds: {}\n", rounds));
                }
                if let Some(seed) = args.seed {
                    summary.push_str(&format!("  Seed: {}\n", seed));
                }
                summary.push_str(&format!("  JSON output: {}\n", args.json));
            }
            Some(Commands::Echo(args)) => {
                summary.push_str("  Command: echo\n");
                if let Some(host) = &args.host {
                    summary.push_str(&format!("  Host: {}\n", host));
                }
                if let Some(port) = args.port {
                    summary.push_str(&format!("  Port: {}\n", port));
                }
                if let Some(timeout) = args.timeout {
                    summary.push_str(&format!("  Timeout: {}s\n", timeout));
                }
            }
            Some(Commands::Chart) => summary.push_str("  Command: chart\n"),
            None => summary.push_str("  Command: none\n"),
        }
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        summary
    }
}

/// Parse a timeout in whole seconds, 1 to 300
fn parse_timeout(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid timeout: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid timeout: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Timeout must be greater than 0".to_string())
            } else if secs > 300 {
                Err("Timeout cannot exceed 300 seconds".to_string())
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
pub fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
