//! Chart-ready tables handed to the presentation layer.

use crate::analyzers::temperature::TempCategory;
use crate::filter::FilterCriteria;
use crate::model::{Season, Weather};
use chrono::NaiveDate;
use serde::Serialize;

/// Headline metrics over a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub records: usize,
    pub total_rentals: u64,
    pub casual_rentals: u64,
    pub registered_rentals: u64,
    /// 0.0 for an empty view.
    pub mean_rentals: f64,
    /// `mean_rentals` rounded to two decimals.
    pub mean_rentals_display: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonTotal {
    pub season: Season,
    pub total_rentals: u64,
}

/// Every rental count observed under one weather label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherDistribution {
    pub weather: Weather,
    pub counts: Vec<u32>,
}

/// One calendar month of the monthly trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    /// First day of the month.
    pub month: NaiveDate,
    /// `YYYY-Mon`, e.g. `2011-Jan`.
    pub label: String,
    pub total_rentals: u64,
}

/// Mean rentals on working days vs. holidays. A missing group reports 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayKindComparison {
    pub working_day_mean: f64,
    pub working_day_records: usize,
    pub holiday_mean: f64,
    pub holiday_records: usize,
}

/// Variables of the correlation matrix, in row/column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Temp,
    FeelsLike,
    Humidity,
    WindSpeed,
    Count,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Temp,
        Metric::FeelsLike,
        Metric::Humidity,
        Metric::WindSpeed,
        Metric::Count,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Temp => "temp",
            Metric::FeelsLike => "atemp",
            Metric::Humidity => "hum",
            Metric::WindSpeed => "windspeed",
            Metric::Count => "cnt",
        }
    }
}

/// Symmetric Pearson matrix over [`Metric::ALL`].
///
/// `None` marks an undefined coefficient (a zero-variance series); it
/// serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub metrics: [Metric; 5],
    pub values: [[Option<f64>; 5]; 5],
}

impl CorrelationMatrix {
    pub fn get(&self, row: Metric, col: Metric) -> Option<f64> {
        self.values[row as usize][col as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TempCategoryMean {
    pub category: TempCategory,
    pub mean_rentals: f64,
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyMean {
    pub hour: u8,
    pub mean_rentals: f64,
    pub records: usize,
}

/// Everything the dashboard renders for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardAggregate {
    pub criteria: FilterCriteria,
    pub summary: Summary,
    pub season_totals: Vec<SeasonTotal>,
    pub weather_distribution: Vec<WeatherDistribution>,
    pub monthly_trend: Vec<MonthlyBucket>,
    /// Computed over the hourly view.
    pub day_kind: DayKindComparison,
    pub correlation: CorrelationMatrix,
    pub temperature_categories: Vec<TempCategoryMean>,
    /// Computed over the hourly view.
    pub hourly_profile: Vec<HourlyMean>,
}
