//! Record types and the categorical code maps of the bike-sharing dataset.

use crate::error::LabelError;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which of the two record sets a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// Decodes the dataset's `season` column (1..=4).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Season::Spring),
            2 => Some(Season::Summer),
            3 => Some(Season::Fall),
            4 => Some(Season::Winter),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Weather {
    Clear,
    Cloudy,
    #[serde(rename = "Light Rain/Snow")]
    LightRainSnow,
    #[serde(rename = "Heavy Rain/Snow")]
    HeavyRainSnow,
}

impl Weather {
    pub const ALL: [Weather; 4] = [
        Weather::Clear,
        Weather::Cloudy,
        Weather::LightRainSnow,
        Weather::HeavyRainSnow,
    ];

    /// Decodes the dataset's `weathersit` column (1..=4).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Weather::Clear),
            2 => Some(Weather::Cloudy),
            3 => Some(Weather::LightRainSnow),
            4 => Some(Weather::HeavyRainSnow),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Cloudy => "Cloudy",
            Weather::LightRainSnow => "Light Rain/Snow",
            Weather::HeavyRainSnow => "Heavy Rain/Snow",
        }
    }
}

/// Decoded `workingday` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DayKind {
    Holiday,
    #[serde(rename = "Working day")]
    WorkingDay,
}

impl DayKind {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(DayKind::Holiday),
            1 => Some(DayKind::WorkingDay),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayKind::Holiday => "Holiday",
            DayKind::WorkingDay => "Working day",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for DayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercases and strips separators so `Light Rain/Snow`, `light-rain-snow`
/// and `LIGHT_RAIN_SNOW` compare equal.
fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-' | '/'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Season {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.trim().parse::<i64>() {
            if let Some(season) = Season::from_code(code) {
                return Ok(season);
            }
        }
        match normalize_label(s).as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            _ => Err(LabelError {
                kind: "season",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for Weather {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.trim().parse::<i64>() {
            if let Some(weather) = Weather::from_code(code) {
                return Ok(weather);
            }
        }
        match normalize_label(s).as_str() {
            "clear" => Ok(Weather::Clear),
            "cloudy" | "mist" => Ok(Weather::Cloudy),
            "lightrain" | "lightsnow" | "lightrainsnow" => Ok(Weather::LightRainSnow),
            "heavyrain" | "heavysnow" | "heavyrainsnow" => Ok(Weather::HeavyRainSnow),
            _ => Err(LabelError {
                kind: "weather",
                value: s.to_string(),
            }),
        }
    }
}

/// One decoded row of either record set.
///
/// Categorical fields are `None` when the source carried a code outside the
/// known map. Such records are never matched by a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    /// Hour of day, only present for hourly records.
    pub hour: Option<u8>,
    pub season: Option<Season>,
    pub weather: Option<Weather>,
    pub day_kind: Option<DayKind>,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub casual: u32,
    pub registered: u32,
    pub count: u32,
}
