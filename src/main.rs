use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use stepsrs::calories;
use stepsrs::logging::{self, LogFormat};
use stepsrs::summary::{LogKind, LogProcessor, LogSummary};
use stepsrs::AppConfig;

/// stepsrs - Step Count Activity Reports
///
/// Turns activity log lines (steps, activity, duration) into distance,
/// speed and calorie reports.
#[derive(Parser)]
#[command(name = "stepsrs")]
#[command(version)]
#[command(about = "Step count activity reports", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format (pretty, json, compact)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct BodyArgs {
    /// Weight in kilograms (defaults to the configured athlete)
    #[arg(short, long)]
    weight: Option<f64>,

    /// Height in meters (defaults to the configured athlete)
    #[arg(long)]
    height: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report a `steps,activity,duration` line
    Training {
        /// Activity line, e.g. "1000,Running,0h30m"
        line: String,

        #[command(flatten)]
        body: BodyArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report a `steps,duration` walking line
    Day {
        /// Activity line, e.g. "6000,1h15m"
        line: String,

        #[command(flatten)]
        body: BodyArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize every line of an activity log file
    Summary {
        /// Log file path
        #[arg(short, long)]
        file: PathBuf,

        /// Line layout (training, day)
        #[arg(short, long, default_value = "training")]
        kind: LogKind,

        #[command(flatten)]
        body: BodyArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or create the configuration file
    Config {
        /// Print the effective configuration
        #[arg(short, long)]
        show: bool,

        /// Write a default configuration file
        #[arg(short, long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Writing the file first lets `config --init` create a file that `-c`
    // names but that does not exist yet
    let mut created = None;
    if let Commands::Config { init: true, .. } = &cli.command {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(AppConfig::default_config_path);
        created = Some(AppConfig::create_default_file(&path)?);
        println!("{} {}", "✓ Wrote configuration to".green(), path.display());
    }

    let config = match created {
        Some(config) => config,
        None => AppConfig::load(cli.config.as_deref())?,
    };

    let mut log_config = config.logging.clone();
    log_config.level = log_config.level.raised_by(cli.verbose);
    if let Some(format) = cli.log_format {
        log_config.format = format;
    }
    logging::init_logging(&log_config)?;

    let formatter = config.formatter()?;

    match cli.command {
        Commands::Training { line, body, json } => {
            let (weight, height) = body_metrics(&body, &config);
            if json {
                let report = formatter.training_report(&line, weight, height)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&formatter.training_info(&line, weight, height));
            }
        }

        Commands::Day { line, body, json } => {
            let (weight, height) = body_metrics(&body, &config);
            if json {
                let report = formatter.day_report(&line, weight, height)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&formatter.day_action_info(&line, weight, height));
            }
        }

        Commands::Summary {
            file,
            kind,
            body,
            json,
        } => {
            let (weight, height) = body_metrics(&body, &config);
            let processor = LogProcessor::new(formatter, weight, height);
            let summary = processor
                .process_file(&file, kind)
                .with_context(|| format!("Failed to process log file: {}", file.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }

        Commands::Config { show, init } => {
            if show || !init {
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

fn body_metrics(body: &BodyArgs, config: &AppConfig) -> (f64, f64) {
    (
        body.weight.unwrap_or(config.athlete.weight_kg),
        body.height.unwrap_or(config.athlete.height_m),
    )
}

fn print_report(report: &str) {
    if report.is_empty() {
        println!("{}", "No activity to report".dimmed());
    } else if report.starts_with(stepsrs::report::PARSE_ERROR_PREFIX)
        || report.starts_with(stepsrs::report::CALCULATION_ERROR_PREFIX)
        || report == stepsrs::UNKNOWN_ACTIVITY
    {
        println!("{}", report.red());
    } else {
        println!("{}", report);
    }
}

fn print_summary(summary: &LogSummary) {
    for (line_number, report) in &summary.reports {
        println!("{}", format!("Line {}", line_number).cyan().bold());
        println!("{}\n", report);
    }

    for failure in &summary.failures {
        println!(
            "{} {}",
            format!("Line {}:", failure.line_number).yellow(),
            failure.message
        );
    }

    println!("{}", "Summary".green().bold());
    println!("  Records: {}", summary.reports.len());
    println!("  Skipped: {}", summary.failures.len());
    println!("  Duration: {:.2} h.", calories::hours(summary.total_duration));
    println!("  Distance: {:.2} km.", summary.total_distance_km);
    println!("  Calories burned: {:.2} kcal.", summary.total_calories);
}
