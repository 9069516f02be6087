//! Topic help with usage examples and configuration reference

use crate::config::env::EnvManager;
use crate::defaults;
use colored::*;

/// Help text beyond what clap generates
pub struct HelpSystem {
    platform: &'static str,
}

impl HelpSystem {
    pub const TOPICS: [&'static str; 5] = ["config", "bench", "echo", "chart", "examples"];

    pub fn new() -> Self {
        Self { platform: std::env::consts::OS }
    }

    /// Display the main help message
    pub fn display_main_help(&self, use_colors: bool) -> String {
        let mut help = String::new();

        help.push_str(&self.format_header(use_colors));
        help.push('\n');
        help.push_str(&self.format_usage_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_examples_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_environment_section(use_colors));

        help
    }

    /// Help for one topic, or `None` if the topic is unknown
    pub fn display_topic_help(&self, topic: &str, use_colors: bool) -> Option<String> {
        match topic.to_lowercase().as_str() {
            "config" | "configuration" | "env" => Some(self.format_configuration_help(use_colors)),
            "bench" | "benchmark" | "workloads" => Some(self.format_bench_help(use_colors)),
            "echo" | "client" => Some(self.format_echo_help(use_colors)),
            "chart" => Some(self.format_chart_help(use_colors)),
            "examples" => Some(self.format_examples_section(use_colors)),
            _ => None,
        }
    }

    fn section(&self, title: &str, use_colors: bool) -> String {
        if use_colors {
            title.bright_green().bold().to_string()
        } else {
            title.to_string()
        }
    }

    fn format_header(&self, use_colors: bool) -> String {
        let title = "boson-bench";
        let subtitle = "Micro-benchmarks (base64, regex, sort, fib) and a single-shot TCP echo client";
        let version = env!("CARGO_PKG_VERSION");

        if use_colors {
            format!(
                "{}\n{}\nVersion: {} | Platform: {}\n",
                title.bright_cyan().bold(),
                subtitle.bright_blue(),
                version.green(),
                self.platform.yellow()
            )
        } else {
            format!("{}\n{}\nVersion: {} | Platform: {}\n", title, subtitle, version, self.platform)
        }
    }

    fn format_usage_section(&self, use_colors: bool) -> String {
        let patterns = [
            "boson-bench bench <base64|regex|sort|fib> [OPTIONS]",
            "boson-bench echo [--host <HOST>] [--port <PORT>] [OPTIONS]",
            "boson-bench chart",
            "boson-bench --help-topic <TOPIC>",
        ];

        let mut usage = format!("{}\n", self.section("USAGE:", use_colors));
        for pattern in patterns {
            if use_colors {
                usage.push_str(&format!("  {}\n", pattern.bright_white()));
            } else {
                usage.push_str(&format!("  {}\n", pattern));
            }
        }
        usage
    }

    fn format_examples_section(&self, use_colors: bool) -> String {
        let examples = [
            ExampleHelp {
                title: "Encode a buffer one million times",
                command: "boson-bench bench base64",
                description: "Prints the elapsed seconds on a single line",
            },
            ExampleHelp {
                title: "Repeat a benchmark and inspect the spread",
                command: "boson-bench bench regex --rounds 5 --verbose",
                description: "One line per round, then a table with mean, percentiles and throughput",
            },
            ExampleHelp {
                title: "Reproducible sort",
                command: "boson-bench bench sort --seed 42 --json",
                description: "Fill and sort timings as a JSON report",
            },
            ExampleHelp {
                title: "Talk to a local echo server",
                command: "boson-bench echo --port 9000",
                description: "Prints the decoded reply and its raw bytes",
            },
            ExampleHelp {
                title: "Comparison chart without colors",
                command: "boson-bench chart --no-color",
                description: "Grouped bars for Python and Boson timings",
            },
        ];

        let mut output = format!("{}\n", self.section("EXAMPLES:", use_colors));
        for example in &examples {
            output.push_str(&example.format(use_colors));
            output.push('\n');
        }
        output
    }

    fn format_environment_section(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n", self.section("ENVIRONMENT VARIABLES:", use_colors));
        output.push_str("Configuration priority: CLI arguments > Environment variables > .env file > Defaults\n\n");

        for (var_name, description, _example) in EnvManager::get_supported_env_vars() {
            if use_colors {
                output.push_str(&format!("  {}: {}\n", var_name.bright_yellow().bold(), description));
            } else {
                output.push_str(&format!("  {}: {}\n", var_name, description));
            }
        }
        output
    }

    fn format_configuration_help(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n\n", self.section("CONFIGURATION REFERENCE", use_colors));
        output.push_str("Values are layered: built-in defaults, then a .env file in the working\n");
        output.push_str("directory, then environment variables, then command line flags.\n\n");

        for (var_name, description, example) in EnvManager::get_supported_env_vars() {
            output.push_str(&format!("  {:<22} {}\n", var_name, description));
            output.push_str(&format!("  {:<22} Example: {}\n", "", example));
        }

        output.push_str("\nExample .env file:\n");
        let example_env = EnvManager::create_example_env_content();
        for line in example_env.lines().filter(|l| !l.is_empty() && !l.starts_with('#')) {
            if use_colors {
                output.push_str(&format!("  {}\n", line.bright_blue()));
            } else {
                output.push_str(&format!("  {}\n", line));
            }
        }
        output
    }

    fn format_bench_help(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n\n", self.section("BENCHMARK WORKLOADS", use_colors));
        output.push_str(&format!(
            "  base64  Encode a fixed 13-byte buffer, {} times by default\n",
            defaults::DEFAULT_ITERATIONS
        ));
        output.push_str(&format!(
            "  regex   Find all matches of {:?} in a fixed sentence, {} times by default\n",
            defaults::REGEX_PATTERN,
            defaults::DEFAULT_ITERATIONS
        ));
        output.push_str(&format!(
            "  sort    Fill {} floats in [0, 1) and sort them once; fill and sort are timed as phases\n",
            defaults::DEFAULT_ITERATIONS
        ));
        output.push_str(&format!(
            "  fib     Compute fib({}) recursively once\n\n",
            defaults::DEFAULT_FIB_DEPTH
        ));
        output.push_str("--iterations sets repetitions for base64 and regex, the element count\n");
        output.push_str("for sort and the depth for fib. BENCH_ITERATIONS never applies to fib;\n");
        output.push_str("use BENCH_FIB_DEPTH for that. --rounds repeats the whole measurement\n");
        output.push_str(&format!("(1 to {}); each round prints its elapsed seconds on its own line.\n", defaults::MAX_ROUNDS));
        output
    }

    fn format_echo_help(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n\n", self.section("ECHO CLIENT", use_colors));
        output.push_str(&format!(
            "Connects to {}:{}, sends {:?}, reads one reply of at most {} bytes and\n",
            defaults::DEFAULT_ECHO_HOST,
            defaults::DEFAULT_ECHO_PORT,
            defaults::DEFAULT_ECHO_MESSAGE,
            defaults::ECHO_RECV_BUFFER
        ));
        output.push_str("prints it twice: decoded as text, then as raw bytes (b'...').\n\n");
        output.push_str("There are no retries. A refused connection exits with code 2, a timeout\n");
        output.push_str(&format!(
            "with code 3 (default {}s, --timeout 1-300), and a reply that is not UTF-8 with code 4.\n",
            defaults::DEFAULT_ECHO_TIMEOUT.as_secs()
        ));
        output
    }

    fn format_chart_help(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n\n", self.section("COMPARISON CHART", use_colors));
        output.push_str("Draws measured Python and Boson timings for 100 to 1000000 function\n");
        output.push_str("calls as grouped text bars, in milliseconds. Nothing is written to disk.\n");
        output
    }
}

impl Default for HelpSystem {
    fn default() -> Self {
        Self::new()
    }
}

struct ExampleHelp {
    title: &'static str,
    command: &'static str,
    description: &'static str,
}

impl ExampleHelp {
    fn format(&self, use_colors: bool) -> String {
        if use_colors {
            format!(
                "  {}:\n    {}\n    {}\n",
                self.title.bright_yellow().bold(),
                self.command.bright_white(),
                self.description.bright_blue().italic()
            )
        } else {
            format!("  {}:\n    {}\n    {}\n", self.title, self.command, self.description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_topic_resolves() {
        let help = HelpSystem::new();
        for topic in HelpSystem::TOPICS {
            assert!(help.display_topic_help(topic, false).is_some(), "topic {}", topic);
        }
        assert!(help.display_topic_help("dns", false).is_none());
    }

    #[test]
    fn test_main_help_sections() {
        let help = HelpSystem::new().display_main_help(false);
        assert!(help.contains("boson-bench"));
        assert!(help.contains("USAGE:"));
        assert!(help.contains("EXAMPLES:"));
        assert!(help.contains("ECHO_PORT"));
    }

    #[test]
    fn test_topic_case_insensitive() {
        let help = HelpSystem::new();
        let text = help.display_topic_help("ECHO", false).unwrap();
        assert!(text.contains("127.0.0.1:9000"));
        assert!(text.contains("1024 bytes"));
    }

    #[test]
    fn test_config_help_lists_example_env() {
        let text = HelpSystem::new().display_topic_help("config", false).unwrap();
        assert!(text.contains("CONFIGURATION REFERENCE"));
        assert!(text.contains("BENCH_ROUNDS="));
    }

    #[test]
    fn test_color_formatting_differences() {
        colored::control::set_override(true);
        let help = HelpSystem::new();
        let plain = help.display_topic_help("chart", false).unwrap();
        let colored = help.display_topic_help("chart", true).unwrap();
        colored::control::unset_override();
        assert_ne!(plain, colored);
    }
}
