//! Option strategy selector - main entry point
//!
//! This binary provides four subcommands:
//! - recommend: Select strategies from answers given as flags or a JSON file
//! - interactive: Answer the questionnaire on the terminal
//! - catalog: List the strategy catalog
//! - questions: List the questionnaire

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Subscriber};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

use commands::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "option-strategy-selector")]
#[command(about = "Recommend option strategies from your market view", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recommend strategies for a set of answers
    Recommend {
        /// JSON file with answers, e.g. {"market_view": "bullish", ...}
        #[arg(short, long)]
        answers: Option<String>,

        /// Market view (bullish, bearish, neutral, uncertain)
        #[arg(long)]
        market_view: Option<String>,

        /// Expected price movement (small, moderate, large)
        #[arg(long)]
        price_movement: Option<String>,

        /// Volatility outlook (increase, decrease, stable, unknown)
        #[arg(long)]
        volatility_view: Option<String>,

        /// Risk tolerance (low, medium, high)
        #[arg(long)]
        risk_tolerance: Option<String>,

        /// Time horizon (short, medium, long)
        #[arg(long)]
        time_horizon: Option<String>,

        /// Display locale (cn, en); overrides config
        #[arg(short, long)]
        locale: Option<String>,

        /// Underlying symbol shown in the report
        #[arg(short, long, default_value = "NVDA")]
        symbol: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Answer the questionnaire interactively
    Interactive {
        /// Initial display locale (cn, en); overrides config
        #[arg(short, long)]
        locale: Option<String>,

        /// Underlying symbol shown in the report
        #[arg(short, long, default_value = "NVDA")]
        symbol: String,
    },

    /// List catalog strategies
    Catalog {
        /// Display locale (cn, en); overrides config
        #[arg(short, long)]
        locale: Option<String>,

        /// Only this category (bullish, bearish, neutral, volatility)
        #[arg(long)]
        category: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List the questionnaire
    Questions {
        /// Display locale (cn, en); overrides config
        #[arg(short, long)]
        locale: Option<String>,

        /// Output format (csv is not supported)
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Subscriber with a file layer and, unless `file_only`, a console layer
fn build_subscriber(
    verbose: bool,
    log_dir: &Path,
    log_filename: &str,
    file_only: bool,
) -> Box<dyn Subscriber + Send + Sync> {
    let level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);

    if file_only {
        // Keep the terminal clean for prompts
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false);

        Box::new(
            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer),
        )
    } else {
        // Console logs go to stderr so JSON/CSV output on stdout stays parseable
        let console_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(true);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false);

        Box::new(
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer),
        )
    }
}

fn setup_logging(verbose: bool, command_name: &str, file_only: bool) -> Result<()> {
    // Create logs directory
    let log_dir = Path::new("logs");
    std::fs::create_dir_all(log_dir)?;

    // Create log file with naming pattern: {command}_{date}.log
    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from(log_dir).join(&log_filename);

    build_subscriber(verbose, log_dir, &log_filename, file_only).init();

    if !file_only {
        info!("Log file: {}", log_path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let (command_name, file_only) = match &cli.command {
        Commands::Recommend { .. } => ("recommend", false),
        Commands::Interactive { .. } => ("interactive", true),
        Commands::Catalog { .. } => ("catalog", false),
        Commands::Questions { .. } => ("questions", false),
    };

    setup_logging(cli.verbose, command_name, file_only)?;

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Recommend {
            answers,
            market_view,
            price_movement,
            volatility_view,
            risk_tolerance,
            time_horizon,
            locale,
            symbol,
            format,
        } => commands::recommend::run(commands::recommend::RecommendArgs {
            config,
            answers_file: answers,
            market_view,
            price_movement,
            volatility_view,
            risk_tolerance,
            time_horizon,
            locale,
            symbol,
            format,
        }),

        Commands::Interactive { locale, symbol } => {
            commands::interactive::run(config, locale, symbol)
        }

        Commands::Catalog {
            locale,
            category,
            format,
        } => commands::catalog::run(config, locale, category, format),

        Commands::Questions { locale, format } => {
            commands::questions::run(config, locale, format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_to_file(file_only: bool) -> String {
        let dir = tempfile::tempdir().unwrap();
        let subscriber = build_subscriber(true, dir.path(), "test.log", file_only);
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("logging smoke test");
        });
        std::fs::read_to_string(dir.path().join("test.log")).unwrap()
    }

    #[test]
    fn test_file_only_logging() {
        assert!(log_to_file(true).contains("logging smoke test"));
    }

    #[test]
    fn test_console_and_file_logging() {
        assert!(log_to_file(false).contains("logging smoke test"));
    }

    #[test]
    fn test_cli_parses_recommend_flags() {
        let cli = Cli::try_parse_from([
            "option-strategy-selector",
            "recommend",
            "--market-view",
            "bullish",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Recommend {
                market_view,
                format,
                symbol,
                ..
            } => {
                assert_eq!(market_view.as_deref(), Some("bullish"));
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(symbol, "NVDA");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
