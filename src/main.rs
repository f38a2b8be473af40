use anyhow::Result;
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fieldplan::calendar::CalendarBuilder;
use fieldplan::config::SurveyConfig;
use fieldplan::export;
use fieldplan::sampling::{stratify, SchedulePlanner};

#[derive(Parser)]
#[command(
    name = "fieldplan",
    version,
    about = "Stratified field-survey sampling scheduler",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a schedule from a survey configuration
    Generate {
        /// Survey configuration file (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Directory the CSV files are written to
        #[arg(short, long, default_value = "schedule")]
        output_dir: PathBuf,

        /// Override the configured random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Schedule rows shown in the console preview
        #[arg(long, default_value = "20")]
        preview: usize,
    },

    /// Print the classified calendar and stratum sizes for a configuration
    Calendar {
        /// Survey configuration file (TOML)
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    setup_tracing(&cli.log_format, cli.verbose)?;

    match cli.command {
        Commands::Generate {
            config,
            output_dir,
            seed,
            preview,
        } => {
            tracing::info!(
                config = %config.display(),
                output_dir = %output_dir.display(),
                seed = ?seed,
                "Starting generate command"
            );
            generate(config, output_dir, seed, preview)?;
        }

        Commands::Calendar { config } => {
            tracing::info!(config = %config.display(), "Starting calendar command");
            calendar(config)?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("fieldplan=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("fieldplan=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

fn generate(
    config_path: PathBuf,
    output_dir: PathBuf,
    seed: Option<u64>,
    preview: usize,
) -> Result<()> {
    let mut config = SurveyConfig::from_file(&config_path)?;
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let planner = SchedulePlanner::new(config)?;
    let outcome = planner.generate()?;

    let written = export::write_schedule_csvs(&outcome.table, &outcome.per_survey, &output_dir)?;

    println!("{}", export::render_preview(&outcome.table, preview));

    for skipped in &outcome.skipped {
        println!("Warning: {skipped}");
    }

    println!("{}", outcome.report.display());

    println!("Written:");
    for path in &written {
        println!("  {}", path.display());
    }

    Ok(())
}

fn calendar(config_path: PathBuf) -> Result<()> {
    let config = SurveyConfig::from_file(&config_path)?;
    config.validate()?;

    let days = CalendarBuilder::new(config.start_date, config.end_date)
        .with_holidays(config.holidays.iter().copied())
        .with_festivals(config.festivals.iter().copied())
        .build()?;

    println!("Calendar: {} days", days.len());
    for day in &days {
        println!(
            "  {} {} ({})",
            day.date,
            day.weekday_name(),
            day.day_type
        );
    }

    let strata = stratify(&days);
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    for day in &days {
        *by_type.entry(day.day_type.to_string()).or_default() += 1;
    }

    println!("\nDay types:");
    for (day_type, count) in by_type {
        println!("  {day_type}: {count}");
    }

    println!("\nStrata:");
    for (key, stratum_days) in &strata {
        println!("  {}: {} days", key, stratum_days.len());
    }

    Ok(())
}
