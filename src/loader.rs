//! CSV loading and the in-process cache of decoded record sets.

use crate::error::{DataLoadError, ParseError};
use crate::filter::DatasetBounds;
use crate::model::{DayKind, Granularity, Record, Season, Weather};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single row as it appears in `day.csv` / `hour.csv`.
///
/// Columns not listed here (`instant`, `yr`, `mnth`, `holiday`, `weekday`)
/// are ignored.
#[derive(Debug, Deserialize)]
struct RawRow {
    dteday: String,
    #[serde(default)]
    hr: Option<i64>,
    season: i64,
    weathersit: i64,
    workingday: i64,
    temp: f64,
    atemp: f64,
    hum: f64,
    windspeed: f64,
    #[serde(default)]
    casual: Option<u32>,
    #[serde(default)]
    registered: Option<u32>,
    cnt: u32,
}

#[derive(Debug, Default)]
struct UnmappedCodes {
    season: usize,
    weather: usize,
    workingday: usize,
}

impl UnmappedCodes {
    fn any(&self) -> bool {
        self.season + self.weather + self.workingday > 0
    }
}

/// Reads and decodes one record set.
///
/// # Errors
///
/// Fails on unreadable files, malformed rows, unparseable dates and, for
/// hourly files, a missing or out-of-range `hr` column. Unknown category
/// codes are not errors: they decode to `None` and are logged.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_records(path: &Path, granularity: Granularity) -> Result<Vec<Record>, DataLoadError> {
    let mut rdr = csv::Reader::from_path(path).map_err(|source| DataLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source: csv::Error| DataLoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = rdr.headers().map_err(csv_err)?.clone();
    let mut records = Vec::new();
    let mut unmapped = UnmappedCodes::default();

    for result in rdr.records() {
        let row = result.map_err(csv_err)?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let raw: RawRow = row.deserialize(Some(&headers)).map_err(csv_err)?;

        let parse_error = |column: &'static str, value: String, reason: String| ParseError {
            path: path.to_path_buf(),
            line,
            column,
            value,
            reason,
        };

        let date = NaiveDate::parse_from_str(raw.dteday.trim(), DATE_FORMAT)
            .map_err(|e| parse_error("dteday", raw.dteday.clone(), e.to_string()))?;

        let hour = match granularity {
            Granularity::Daily => None,
            Granularity::Hourly => match raw.hr {
                Some(hr @ 0..=23) => Some(hr as u8),
                Some(hr) => {
                    return Err(
                        parse_error("hr", hr.to_string(), "hour must be within 0..=23".into())
                            .into(),
                    );
                }
                None => {
                    return Err(parse_error(
                        "hr",
                        String::new(),
                        "hourly records require an hour column".into(),
                    )
                    .into());
                }
            },
        };

        let season = Season::from_code(raw.season);
        let weather = Weather::from_code(raw.weathersit);
        let day_kind = DayKind::from_code(raw.workingday);
        unmapped.season += usize::from(season.is_none());
        unmapped.weather += usize::from(weather.is_none());
        unmapped.workingday += usize::from(day_kind.is_none());

        records.push(Record {
            date,
            hour,
            season,
            weather,
            day_kind,
            temp: raw.temp,
            feels_like: raw.atemp,
            humidity: raw.hum,
            wind_speed: raw.windspeed,
            casual: raw.casual.unwrap_or_default(),
            registered: raw.registered.unwrap_or_default(),
            count: raw.cnt,
        });
    }

    if unmapped.any() {
        warn!(
            season = unmapped.season,
            weather = unmapped.weather,
            workingday = unmapped.workingday,
            "Unmapped category codes; affected records will never match a filter"
        );
    }

    debug!(rows = records.len(), ?granularity, "Record set decoded");
    Ok(records)
}

/// Locations of the two record sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSource {
    pub daily: PathBuf,
    pub hourly: PathBuf,
}

impl DatasetSource {
    pub fn new(daily: impl Into<PathBuf>, hourly: impl Into<PathBuf>) -> Self {
        Self {
            daily: daily.into(),
            hourly: hourly.into(),
        }
    }
}

/// Both decoded record sets. Cloning shares the underlying rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub daily: Arc<[Record]>,
    pub hourly: Arc<[Record]>,
}

impl Dataset {
    /// Date range and category labels available in the daily set.
    pub fn bounds(&self) -> Option<DatasetBounds> {
        DatasetBounds::of(&self.daily)
    }
}

/// Lexically normalized absolute form of `path`, so `day.csv`, `./day.csv`
/// and `/cwd/day.csv` share one cache entry. Symlinks are not resolved and
/// the file need not exist.
fn cache_path(path: &Path) -> PathBuf {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Decoded record sets keyed by normalized source path and granularity.
///
/// A hit returns the stored `Arc` without touching the file; use
/// [`DatasetCache::reload`] or [`DatasetCache::invalidate`] after the
/// source changes.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<(PathBuf, Granularity), Arc<[Record]>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(
        &mut self,
        path: &Path,
        granularity: Granularity,
    ) -> Result<Arc<[Record]>, DataLoadError> {
        let key = (cache_path(path), granularity);
        if let Some(records) = self.entries.get(&key) {
            debug!(path = %path.display(), ?granularity, "Record set cache hit");
            return Ok(Arc::clone(records));
        }

        let records: Arc<[Record]> = load_records(path, granularity)?.into();
        info!(path = %path.display(), ?granularity, rows = records.len(), "Record set loaded");
        self.entries.insert(key, Arc::clone(&records));
        Ok(records)
    }

    /// Re-reads a record set, replacing any cached copy.
    ///
    /// The previous entry is kept if the re-read fails.
    pub fn reload(
        &mut self,
        path: &Path,
        granularity: Granularity,
    ) -> Result<Arc<[Record]>, DataLoadError> {
        let records: Arc<[Record]> = load_records(path, granularity)?.into();
        self.entries
            .insert((cache_path(path), granularity), Arc::clone(&records));
        Ok(records)
    }

    /// Drops one cached record set. Returns whether an entry was present.
    pub fn invalidate(&mut self, path: &Path, granularity: Granularity) -> bool {
        self.entries
            .remove(&(cache_path(path), granularity))
            .is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads (or fetches from cache) both record sets of `source`.
    pub fn load_dataset(&mut self, source: &DatasetSource) -> Result<Dataset, DataLoadError> {
        Ok(Dataset {
            daily: self.get_or_load(&source.daily, Granularity::Daily)?,
            hourly: self.get_or_load(&source.hourly, Granularity::Hourly)?,
        })
    }
}
