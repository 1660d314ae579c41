//! Rendering and export of dashboard aggregates.
//!
//! Supports a plain-text report, JSON serialization, and CSV export of the
//! chart tables.

use anyhow::Result;
use tracing::{debug, info};

use crate::analyzers::types::{DashboardAggregate, Metric};
use crate::filter::DatasetBounds;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn fmt_coefficient(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:>9.3}"),
        None => format!("{:>9}", "n/a"),
    }
}

/// Writes a human-readable report of every dashboard table.
pub fn write_report<W: Write>(out: &mut W, aggregate: &DashboardAggregate) -> Result<()> {
    let criteria = &aggregate.criteria;
    let join = |labels: Vec<&str>| labels.join(", ");

    writeln!(out, "Filter")?;
    writeln!(out, "  dates:   {} .. {}", criteria.start(), criteria.end())?;
    writeln!(
        out,
        "  seasons: {}",
        join(criteria.seasons().iter().map(|s| s.label()).collect())
    )?;
    writeln!(
        out,
        "  weather: {}",
        join(criteria.weathers().iter().map(|w| w.label()).collect())
    )?;

    let s = &aggregate.summary;
    writeln!(out)?;
    writeln!(out, "Summary")?;
    writeln!(out, "  days:          {}", s.records)?;
    writeln!(out, "  total rentals: {}", s.total_rentals)?;
    writeln!(out, "  mean rentals:  {:.2}", s.mean_rentals_display)?;
    writeln!(
        out,
        "  casual / registered: {} / {}",
        s.casual_rentals, s.registered_rentals
    )?;

    writeln!(out)?;
    writeln!(out, "Total rentals per season")?;
    for t in &aggregate.season_totals {
        writeln!(out, "  {:<8} {:>10}", t.season.label(), t.total_rentals)?;
    }

    writeln!(out)?;
    writeln!(out, "Rental counts by weather")?;
    for d in &aggregate.weather_distribution {
        let min = d.counts.iter().min().copied().unwrap_or_default();
        let max = d.counts.iter().max().copied().unwrap_or_default();
        writeln!(
            out,
            "  {:<16} n={:<5} min={:<6} max={}",
            d.weather.label(),
            d.counts.len(),
            min,
            max
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Monthly trend")?;
    for b in &aggregate.monthly_trend {
        writeln!(out, "  {:<9} {:>10}", b.label, b.total_rentals)?;
    }

    let dk = &aggregate.day_kind;
    writeln!(out)?;
    writeln!(out, "Hourly rentals: working day vs. holiday")?;
    writeln!(
        out,
        "  working day: {:.0} (n={})",
        dk.working_day_mean, dk.working_day_records
    )?;
    writeln!(
        out,
        "  holiday:     {:.0} (n={})",
        dk.holiday_mean, dk.holiday_records
    )?;

    writeln!(out)?;
    writeln!(out, "Correlation")?;
    write!(out, "  {:<10}", "")?;
    for m in Metric::ALL {
        write!(out, "{:>9}", m.label())?;
    }
    writeln!(out)?;
    for row in Metric::ALL {
        write!(out, "  {:<10}", row.label())?;
        for col in Metric::ALL {
            write!(out, "{}", fmt_coefficient(aggregate.correlation.get(row, col)))?;
        }
        writeln!(out)?;
    }

    writeln!(out)?;
    writeln!(out, "Mean rentals per temperature band")?;
    for c in &aggregate.temperature_categories {
        writeln!(
            out,
            "  {:<10} {:>10.2} (n={})",
            c.category.label(),
            c.mean_rentals,
            c.records
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Mean rentals per hour")?;
    for h in &aggregate.hourly_profile {
        writeln!(out, "  {:02}:00 {:>10.2}", h.hour, h.mean_rentals)?;
    }

    Ok(())
}

/// Writes the aggregate as pretty-printed JSON. Undefined correlation
/// coefficients appear as `null`.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Writes the date range and labels a dataset offers.
pub fn write_bounds<W: Write>(out: &mut W, bounds: &DatasetBounds) -> Result<()> {
    writeln!(out, "dates:   {} .. {}", bounds.first, bounds.last)?;
    let seasons: Vec<&str> = bounds.seasons.iter().map(|s| s.label()).collect();
    let weathers: Vec<&str> = bounds.weathers.iter().map(|w| w.label()).collect();
    writeln!(out, "seasons: {}", seasons.join(", "))?;
    writeln!(out, "weather: {}", weathers.join(", "))?;
    Ok(())
}

/// Writes `rows` to a new CSV file at `path`, with a header row.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the aggregate JSON and the flat chart tables into `dir`.
///
/// Returns the paths written.
pub fn export(dir: &Path, aggregate: &DashboardAggregate) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let json_path = dir.join("aggregate.json");
    let mut file = fs::File::create(&json_path)?;
    write_json(&mut file, aggregate)?;

    let monthly_path = dir.join("monthly_trend.csv");
    write_csv(&monthly_path, &aggregate.monthly_trend)?;

    let seasons_path = dir.join("season_totals.csv");
    write_csv(&seasons_path, &aggregate.season_totals)?;

    let temps_path = dir.join("temperature_categories.csv");
    write_csv(&temps_path, &aggregate.temperature_categories)?;

    let written = vec![json_path, monthly_path, seasons_path, temps_path];
    info!(dir = %dir.display(), files = written.len(), "Export complete");
    Ok(written)
}
