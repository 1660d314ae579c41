//! CLI entry point for the bike-sharing dashboard.
//!
//! Provides subcommands for printing the dashboard tables for one filter
//! selection, exporting them to files, listing what the dataset offers, and
//! exploring several selections against the cached record sets.

use anyhow::{Context, Result, bail};
use bikeshare_dashboard::analyzers::analyzer::Dashboard;
use bikeshare_dashboard::config::DashboardConfig;
use bikeshare_dashboard::filter::{DatasetBounds, FilterCriteria};
use bikeshare_dashboard::loader::DatasetSource;
use bikeshare_dashboard::model::{Season, Weather};
use bikeshare_dashboard::output::{export, write_bounds, write_json, write_report};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::Directive,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_dashboard")]
#[command(about = "Rental analytics over the bike-sharing daily and hourly datasets", long_about = None)]
struct Cli {
    /// Daily records CSV (overrides BIKESHARE_DAILY_CSV)
    #[arg(long, global = true, value_name = "PATH")]
    daily: Option<PathBuf>,

    /// Hourly records CSV (overrides BIKESHARE_HOURLY_CSV)
    #[arg(long, global = true, value_name = "PATH")]
    hourly: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// First day to include (defaults to the first day in the data)
    #[arg(long, value_name = "YYYY-MM-DD")]
    start: Option<NaiveDate>,

    /// Last day to include (defaults to the last day in the data)
    #[arg(long, value_name = "YYYY-MM-DD")]
    end: Option<NaiveDate>,

    /// Season to include; repeat or comma-separate (defaults to all)
    #[arg(long = "season", value_name = "SEASON", value_delimiter = ',')]
    seasons: Vec<Season>,

    /// Weather condition to include; repeat or comma-separate (defaults to all)
    #[arg(long = "weather", value_name = "WEATHER", value_delimiter = ',')]
    weathers: Vec<Weather>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every dashboard table for one filter selection
    Summary {
        #[command(flatten)]
        filter: FilterArgs,

        /// Print JSON instead of the text report
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the date range and labels available for filtering
    Bounds {
        /// Print JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write the aggregate JSON and chart tables as CSV files
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Directory to write into
        #[arg(short, long, default_value = "dashboard_export")]
        out_dir: PathBuf,
    },
    /// Read one filter selection per stdin line and print its summary
    ///
    /// Lines take the same flags as `summary` (e.g. `--season fall --weather clear`).
    /// `reload` re-reads the CSV files; `quit` exits.
    Explore,
}

/// One `explore` input line.
#[derive(Parser)]
#[command(no_binary_name = true)]
struct ExploreLine {
    #[command(flatten)]
    filter: FilterArgs,

    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = DashboardConfig::from_env();
    let _file_guard = init_logging(&config.log_file_path)?;

    let cli = Cli::parse();

    let source = DatasetSource::new(
        cli.daily.unwrap_or(config.daily_csv),
        cli.hourly.unwrap_or(config.hourly_csv),
    );
    debug!(daily = %source.daily.display(), hourly = %source.hourly.display(), "Dataset source");
    let mut dashboard = Dashboard::new(source);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Summary { filter, json } => {
            let criteria = build_criteria(&filter, &bounds(&mut dashboard)?)?;
            let aggregate = dashboard.recompute(&criteria)?;
            if json {
                write_json(&mut out, &aggregate)?;
            } else {
                write_report(&mut out, &aggregate)?;
            }
        }
        Commands::Bounds { json } => {
            let bounds = bounds(&mut dashboard)?;
            if json {
                write_json(&mut out, &bounds)?;
            } else {
                write_bounds(&mut out, &bounds)?;
            }
        }
        Commands::Export { filter, out_dir } => {
            let criteria = build_criteria(&filter, &bounds(&mut dashboard)?)?;
            let aggregate = dashboard.recompute(&criteria)?;
            for path in export(&out_dir, &aggregate)? {
                writeln!(out, "{}", path.display())?;
            }
        }
        Commands::Explore => explore(&mut dashboard, &mut out)?,
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_logging(log_file_path: &Path) -> Result<WorkerGuard> {
    let log_dir = log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse::<Directive>()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse::<Directive>()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

fn bounds(dashboard: &mut Dashboard) -> Result<DatasetBounds> {
    let dataset = dashboard.dataset()?;
    match dataset.bounds() {
        Some(bounds) => Ok(bounds),
        None => bail!(
            "daily record set {} is empty",
            dashboard.source().daily.display()
        ),
    }
}

/// Fills unset flags from the dataset bounds, as the dashboard's initial
/// selection does.
fn build_criteria(filter: &FilterArgs, bounds: &DatasetBounds) -> Result<FilterCriteria> {
    let seasons = if filter.seasons.is_empty() {
        bounds.seasons.clone()
    } else {
        filter.seasons.clone()
    };
    let weathers = if filter.weathers.is_empty() {
        bounds.weathers.clone()
    } else {
        filter.weathers.clone()
    };

    let criteria = FilterCriteria::new(
        filter.start.unwrap_or(bounds.first),
        filter.end.unwrap_or(bounds.last),
        seasons,
        weathers,
    )?;
    Ok(criteria)
}

/// Recomputes once per stdin line; the record sets are read only once.
fn explore<W: Write>(dashboard: &mut Dashboard, out: &mut W) -> Result<()> {
    let stdin = std::io::stdin();
    let mut lines = 0usize;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let line = line.trim();
        match line {
            "" => continue,
            "quit" | "exit" => break,
            "reload" => {
                dashboard.invalidate();
                info!("Record sets will be re-read on next query");
                continue;
            }
            _ => {}
        }

        lines += 1;
        let parsed = match ExploreLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        let criteria = match build_criteria(&parsed.filter, &bounds(dashboard)?) {
            Ok(criteria) => criteria,
            Err(e) => {
                warn!(error = %e, "Rejected filter");
                writeln!(out, "error: {e}")?;
                continue;
            }
        };

        let aggregate = dashboard.recompute(&criteria)?;
        if parsed.json {
            write_json(out, &aggregate)?;
        } else {
            write_report(out, &aggregate)?;
        }
        writeln!(out)?;
        out.flush()?;
    }

    info!(queries = lines, "Explore session finished");
    Ok(())
}
