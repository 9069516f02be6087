//! boson-bench - command line entry point
//!
//! Runs one micro-benchmark, one echo exchange or prints the comparison
//! chart. Results go to stdout, diagnostics and logs to stderr.

use boson_bench::{
    cli::{Cli, Commands},
    client::{EchoClient, TcpEchoClient},
    config::{display_config_summary, load_config, validate_config, EnvManager, ValidationLevel},
    error::{ErrorReporter, Result},
    harness::BenchmarkExecutor,
    logging::LoggerFactory,
    models::Config,
    output::{BarChart, OutputCoordinator},
    log_debug,
    workloads::create_workload,
    build_info, BUILD_PROFILE, PKG_NAME,
};
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("{} panicked: {}", PKG_NAME, panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    if cli.should_show_topic_help() {
        println!("{}", cli.display_help());
        return;
    }

    let use_colors = cli.use_colors();
    let config = match load_config(cli.clone()) {
        Ok(config) => config,
        Err(e) => {
            ErrorReporter::new(use_colors, cli.verbose).report_error(&e);
            // list every bad variable, not just the first one parsing hit
            for issue in EnvManager::validate_current_env() {
                eprintln!("{}", issue.format(use_colors));
            }
            process::exit(e.exit_code());
        }
    };

    let factory = LoggerFactory::new(config.clone());

    if let Err(e) = run_application(&cli, &config, &factory).await {
        factory.create_error_logger().log_error(&e, Some("run")).await;
        ErrorReporter::new(config.enable_color, config.verbose).report_error(&e);
        process::exit(e.exit_code());
    }
}

async fn run_application(cli: &Cli, config: &Config, factory: &LoggerFactory) -> Result<()> {
    if config.debug {
        eprintln!("{} (session {})", build_info(), factory.session_id());
        if BUILD_PROFILE != "release" {
            eprintln!("Note: {} build; timings are not representative", BUILD_PROFILE);
        }
        eprintln!("{}", cli.get_config_summary());
        eprintln!("{}", display_config_summary(config));
    }

    let logger = factory.create_logger("MAIN").await;
    log_debug!(logger, "dispatching {}", cli.command_name());

    let warnings = validate_config(config, cli.command.as_ref())?;
    for warning in warnings
        .iter()
        .filter(|w| w.level != ValidationLevel::Info || config.verbose)
    {
        eprintln!("{}", warning.format(config.enable_color));
    }

    let coordinator = OutputCoordinator::from_config(config);

    match &cli.command {
        Some(Commands::Bench(args)) => {
            let mut workload = create_workload(args.workload, config)?;
            let executor =
                BenchmarkExecutor::new(config.rounds).with_logger(factory.create_bench_logger().await);
            let report = executor.run(workload.as_mut()).await?;
            println!("{}", coordinator.render_bench(&report)?);
        }
        Some(Commands::Echo(_)) => {
            let client = TcpEchoClient::from_config(config).with_logger(factory.create_network_logger().await);
            let exchange = client.exchange(config.echo_message.as_bytes()).await?;
            println!("{}", coordinator.render_echo(&exchange)?);
        }
        Some(Commands::Chart) => {
            let chart = BarChart::comparison()?;
            println!("{}", coordinator.render_chart(&chart)?);
        }
        None => println!("{}", cli.display_help()),
    }

    Ok(())
}
