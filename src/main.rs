use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use timecard_stats::calendar::{split_by_day, trailing_days_scope};
use timecard_stats::input::{load_cards, load_reviews};
use timecard_stats::report::{build_report, format_duration};
use timecard_stats::{
    compute_stats, DayCalendar, FixedOffsetCalendar, LocalCalendar, StatsOptions, TimeInterval,
};

#[derive(Parser)]
#[command(name = "timecard-stats")]
#[command(about = "Usage statistics from overlapping activity cards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute usage statistics for a time window
    Stats {
        /// Cards file (.json or .csv)
        #[arg(long)]
        cards: PathBuf,
        /// Rating segments file (.json or .csv)
        #[arg(long)]
        reviews: Option<PathBuf>,
        #[arg(long, requires = "end_ts")]
        start_ts: Option<i64>,
        #[arg(long, requires = "start_ts")]
        end_ts: Option<i64>,
        /// Last N calendar days, used unless --start-ts/--end-ts are given
        #[arg(long, default_value_t = 7)]
        since_days: u32,
        /// Let System cards fill otherwise untracked gaps
        #[arg(long)]
        include_system: bool,
        #[arg(long, default_value = "Work")]
        focus_category: String,
        /// Day boundaries at a fixed UTC offset instead of local time
        #[arg(long, allow_hyphen_values = true)]
        utc_offset_minutes: Option<i32>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Show how an interval splits across calendar days
    Split {
        #[arg(long)]
        start_ts: i64,
        #[arg(long)]
        end_ts: i64,
        #[arg(long, allow_hyphen_values = true)]
        utc_offset_minutes: Option<i32>,
    },
}

fn calendar_for(utc_offset_minutes: Option<i32>) -> anyhow::Result<Box<dyn DayCalendar>> {
    match utc_offset_minutes {
        Some(minutes) => {
            let calendar = FixedOffsetCalendar::from_offset_minutes(minutes)
                .with_context(|| format!("UTC offset {minutes} minutes is out of range"))?;
            Ok(Box::new(calendar))
        }
        None => Ok(Box::new(LocalCalendar)),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stats {
            cards,
            reviews,
            start_ts,
            end_ts,
            since_days,
            include_system,
            focus_category,
            utc_offset_minutes,
            format,
        } => {
            let calendar = calendar_for(utc_offset_minutes)?;
            let scope = match (start_ts, end_ts) {
                (Some(start_ts), Some(end_ts)) => TimeInterval::new(start_ts, end_ts),
                _ => trailing_days_scope(calendar.as_ref(), Utc::now().timestamp(), since_days)
                    .context("failed to resolve the trailing day window")?,
            };

            let raw_cards = load_cards(&cards)
                .with_context(|| format!("failed to load cards from {}", cards.display()))?;
            let raw_reviews = match &reviews {
                Some(path) => load_reviews(path)
                    .with_context(|| format!("failed to load ratings from {}", path.display()))?,
                None => Vec::new(),
            };
            info!(
                "loaded {} cards and {} rating segments",
                raw_cards.len(),
                raw_reviews.len()
            );

            let options = StatsOptions {
                include_system,
                focus_category,
            };
            let stats = compute_stats(
                scope,
                &raw_cards,
                &raw_reviews,
                &options,
                calendar.as_ref(),
            )
            .context("failed to compute stats")?;

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                }
                OutputFormat::Markdown => {
                    print!("{}", build_report(&stats));
                }
            }
        }
        Commands::Split {
            start_ts,
            end_ts,
            utc_offset_minutes,
        } => {
            if end_ts <= start_ts {
                bail!("--end-ts must be after --start-ts");
            }
            let calendar = calendar_for(utc_offset_minutes)?;
            let interval = TimeInterval::new(start_ts, end_ts);
            let slices = split_by_day(interval, interval, calendar.as_ref())
                .context("failed to split interval by day")?;

            for slice in slices {
                println!(
                    "{} {}..{} ({})",
                    slice.day_key,
                    slice.start_ts,
                    slice.end_ts,
                    format_duration(slice.duration_secs())
                );
            }
        }
    }

    Ok(())
}
