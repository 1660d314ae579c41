use crate::analyzers::aggregate::{
    correlation_matrix, day_kind_comparison, hourly_profile, monthly_trend, season_totals,
    summarize, temperature_categories, weather_distribution,
};
use crate::analyzers::types::DashboardAggregate;
use crate::error::DataLoadError;
use crate::filter::{FilterCriteria, apply};
use crate::loader::{Dataset, DatasetCache, DatasetSource};
use tracing::debug;

/// Filters both record sets and computes every dashboard table.
///
/// Daily tables come from the daily view; the working-day comparison and
/// the hourly profile come from the hourly view.
#[tracing::instrument(skip_all, fields(start = %criteria.start(), end = %criteria.end()))]
pub fn recompute(dataset: &Dataset, criteria: &FilterCriteria) -> DashboardAggregate {
    let daily = apply(&dataset.daily, criteria);
    let hourly = apply(&dataset.hourly, criteria);
    debug!(
        daily_rows = daily.len(),
        hourly_rows = hourly.len(),
        "Filtered record sets"
    );

    DashboardAggregate {
        criteria: criteria.clone(),
        summary: summarize(&daily),
        season_totals: season_totals(&daily),
        weather_distribution: weather_distribution(&daily),
        monthly_trend: monthly_trend(&daily),
        day_kind: day_kind_comparison(&hourly),
        correlation: correlation_matrix(&daily),
        temperature_categories: temperature_categories(&daily),
        hourly_profile: hourly_profile(&hourly),
    }
}

/// A record-set cache bound to one source, for callers that recompute on
/// every selection change.
#[derive(Debug)]
pub struct Dashboard {
    source: DatasetSource,
    cache: DatasetCache,
}

impl Dashboard {
    pub fn new(source: DatasetSource) -> Self {
        Self::with_cache(source, DatasetCache::new())
    }

    pub fn with_cache(source: DatasetSource, cache: DatasetCache) -> Self {
        Self { source, cache }
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// Both record sets, read from disk only on first use.
    pub fn dataset(&mut self) -> Result<Dataset, DataLoadError> {
        self.cache.load_dataset(&self.source)
    }

    /// Initial selection: full date range, every label present.
    ///
    /// `None` when the daily set is empty.
    pub fn default_criteria(&mut self) -> Result<Option<FilterCriteria>, DataLoadError> {
        Ok(FilterCriteria::spanning(&self.dataset()?.daily))
    }

    pub fn recompute(&mut self, criteria: &FilterCriteria) -> Result<DashboardAggregate, DataLoadError> {
        let dataset = self.dataset()?;
        Ok(recompute(&dataset, criteria))
    }

    /// Drops both cached record sets so the next call re-reads them.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::{date, record};
    use crate::model::{DayKind, Record, Season, Weather};
    use std::sync::Arc;

    fn dataset() -> Dataset {
        let daily = vec![
            record(date(2011, 1, 1), Season::Spring, Weather::Clear, 10),
            record(date(2011, 1, 2), Season::Spring, Weather::Cloudy, 20),
            record(date(2011, 1, 3), Season::Summer, Weather::Clear, 30),
        ];
        let hourly: Vec<Record> = daily
            .iter()
            .flat_map(|day| {
                (0..2u8).map(move |hour| Record {
                    hour: Some(hour),
                    count: day.count / 2,
                    ..day.clone()
                })
            })
            .collect();

        Dataset {
            daily: Arc::from(daily),
            hourly: Arc::from(hourly),
        }
    }

    #[test]
    fn test_recompute_spring_only() {
        let dataset = dataset();
        let criteria = FilterCriteria::new(
            date(2011, 1, 1),
            date(2011, 1, 3),
            [Season::Spring],
            Weather::ALL,
        )
        .unwrap();

        let aggregate = recompute(&dataset, &criteria);
        assert_eq!(aggregate.summary.records, 2);
        assert_eq!(aggregate.summary.total_rentals, 30);
        assert_eq!(aggregate.summary.mean_rentals_display, 15.0);
        assert_eq!(aggregate.season_totals.len(), 1);
        assert_eq!(aggregate.monthly_trend.len(), 1);
        assert_eq!(aggregate.monthly_trend[0].label, "2011-Jan");
        assert_eq!(aggregate.hourly_profile.len(), 2);
        assert_eq!(aggregate.day_kind.working_day_records, 4);
        assert_eq!(aggregate.day_kind.holiday_mean, 0.0);
        assert_eq!(aggregate.criteria, criteria);
    }

    #[test]
    fn test_recompute_is_pure() {
        let dataset = dataset();
        let criteria = FilterCriteria::spanning(&dataset.daily).unwrap();

        let first = recompute(&dataset, &criteria);
        let second = recompute(&dataset, &criteria);
        assert_eq!(first, second);
        assert_eq!(dataset.daily.len(), 3);
    }

    #[test]
    fn test_hourly_view_drives_day_kind() {
        let mut dataset = dataset();
        let mut hourly = dataset.hourly.to_vec();
        hourly[0].day_kind = Some(DayKind::Holiday);
        dataset.hourly = Arc::from(hourly);

        let criteria = FilterCriteria::spanning(&dataset.daily).unwrap();
        let aggregate = recompute(&dataset, &criteria);
        assert_eq!(aggregate.day_kind.holiday_records, 1);
        assert_eq!(aggregate.day_kind.holiday_mean, 5.0);
    }
}
