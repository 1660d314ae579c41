use crate::analyzers::temperature::categorize;
use crate::analyzers::types::{
    CorrelationMatrix, DayKindComparison, HourlyMean, Metric, MonthlyBucket, SeasonTotal, Summary,
    TempCategoryMean, WeatherDistribution,
};
use crate::analyzers::utility::{mean, pearson, round2};
use crate::filter::FilteredView;
use crate::model::{DayKind, Record};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

fn counts(view: &FilteredView<'_>) -> Vec<f64> {
    view.iter().map(|r| f64::from(r.count)).collect()
}

/// Record count, rental sums and mean over the view.
pub fn summarize(view: &FilteredView<'_>) -> Summary {
    let total_rentals = view.iter().map(|r| u64::from(r.count)).sum();
    let casual_rentals = view.iter().map(|r| u64::from(r.casual)).sum();
    let registered_rentals = view.iter().map(|r| u64::from(r.registered)).sum();
    let mean_rentals = mean(&counts(view));

    Summary {
        records: view.len(),
        total_rentals,
        casual_rentals,
        registered_rentals,
        mean_rentals,
        mean_rentals_display: round2(mean_rentals),
    }
}

/// Rental sum per season present in the view, in season order.
pub fn season_totals(view: &FilteredView<'_>) -> Vec<SeasonTotal> {
    let mut totals = BTreeMap::new();
    for r in view.iter() {
        if let Some(season) = r.season {
            *totals.entry(season).or_insert(0u64) += u64::from(r.count);
        }
    }

    totals
        .into_iter()
        .map(|(season, total_rentals)| SeasonTotal {
            season,
            total_rentals,
        })
        .collect()
}

/// Raw rental counts grouped by weather label; quartiles are left to the
/// renderer.
pub fn weather_distribution(view: &FilteredView<'_>) -> Vec<WeatherDistribution> {
    let mut groups: BTreeMap<_, Vec<u32>> = BTreeMap::new();
    for r in view.iter() {
        if let Some(weather) = r.weather {
            groups.entry(weather).or_default().push(r.count);
        }
    }

    groups
        .into_iter()
        .map(|(weather, counts)| WeatherDistribution { weather, counts })
        .collect()
}

/// Calendar-month sums, oldest first.
///
/// Months between the first and last populated month that have no records
/// in the view are reported with a zero total.
pub fn monthly_trend(view: &FilteredView<'_>) -> Vec<MonthlyBucket> {
    let mut sums: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for r in view.iter() {
        *sums.entry((r.date.year(), r.date.month())).or_default() += u64::from(r.count);
    }

    let (Some(&first), Some(&last)) = (sums.keys().next(), sums.keys().next_back()) else {
        return Vec::new();
    };

    let mut buckets = Vec::new();
    let (mut year, mut month) = first;
    while (year, month) <= last {
        let Some(start) = NaiveDate::from_ymd_opt(year, month, 1) else {
            break;
        };
        buckets.push(MonthlyBucket {
            month: start,
            label: start.format("%Y-%b").to_string(),
            total_rentals: sums.get(&(year, month)).copied().unwrap_or_default(),
        });

        (year, month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
    }

    buckets
}

/// Mean rentals per working-day label. Works on either record set.
pub fn day_kind_comparison(view: &FilteredView<'_>) -> DayKindComparison {
    let select = |kind: DayKind| -> Vec<f64> {
        view.iter()
            .filter(|r| r.day_kind == Some(kind))
            .map(|r| f64::from(r.count))
            .collect()
    };
    let working = select(DayKind::WorkingDay);
    let holiday = select(DayKind::Holiday);

    DayKindComparison {
        working_day_mean: mean(&working),
        working_day_records: working.len(),
        holiday_mean: mean(&holiday),
        holiday_records: holiday.len(),
    }
}

fn metric_value(record: &Record, metric: Metric) -> f64 {
    match metric {
        Metric::Temp => record.temp,
        Metric::FeelsLike => record.feels_like,
        Metric::Humidity => record.humidity,
        Metric::WindSpeed => record.wind_speed,
        Metric::Count => f64::from(record.count),
    }
}

/// Pearson coefficients between every pair of [`Metric`]s.
pub fn correlation_matrix(view: &FilteredView<'_>) -> CorrelationMatrix {
    let series: Vec<Vec<f64>> = Metric::ALL
        .iter()
        .map(|&m| view.iter().map(|r| metric_value(r, m)).collect())
        .collect();

    let mut values = [[None; 5]; 5];
    for i in 0..Metric::ALL.len() {
        // Diagonal is 1.0 unless the series is constant.
        values[i][i] = pearson(&series[i], &series[i]).map(|_| 1.0);
        for j in (i + 1)..Metric::ALL.len() {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        metrics: Metric::ALL,
        values,
    }
}

/// Mean rentals per temperature band, highest mean first.
pub fn temperature_categories(view: &FilteredView<'_>) -> Vec<TempCategoryMean> {
    let mut groups: BTreeMap<_, Vec<f64>> = BTreeMap::new();
    for r in view.iter() {
        groups
            .entry(categorize(r.temp))
            .or_default()
            .push(f64::from(r.count));
    }

    let mut categories: Vec<TempCategoryMean> = groups
        .into_iter()
        .map(|(category, counts)| TempCategoryMean {
            category,
            mean_rentals: mean(&counts),
            records: counts.len(),
        })
        .collect();
    categories.sort_by(|a, b| b.mean_rentals.total_cmp(&a.mean_rentals));
    categories
}

/// Mean rentals per hour of day. Records without an hour are skipped.
pub fn hourly_profile(view: &FilteredView<'_>) -> Vec<HourlyMean> {
    let mut groups: BTreeMap<u8, Vec<f64>> = BTreeMap::new();
    for r in view.iter() {
        if let Some(hour) = r.hour {
            groups.entry(hour).or_default().push(f64::from(r.count));
        }
    }

    groups
        .into_iter()
        .map(|(hour, counts)| HourlyMean {
            hour,
            mean_rentals: mean(&counts),
            records: counts.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::temperature::TempCategory;
    use crate::filter::tests::{date, record};
    use crate::filter::{FilterCriteria, apply};
    use crate::model::{Season, Weather};

    fn everything(records: &[Record]) -> FilteredView<'_> {
        let criteria = FilterCriteria::new(
            date(2000, 1, 1),
            date(2100, 1, 1),
            Season::ALL,
            Weather::ALL,
        )
        .unwrap();
        apply(records, &criteria)
    }

    fn three_days() -> Vec<Record> {
        vec![
            record(date(2011, 1, 1), Season::Spring, Weather::Clear, 10),
            record(date(2011, 1, 2), Season::Spring, Weather::Cloudy, 20),
            record(date(2011, 1, 3), Season::Summer, Weather::Clear, 30),
        ]
    }

    #[test]
    fn test_spring_only_summary() {
        let records = three_days();
        let criteria = FilterCriteria::new(
            date(2011, 1, 1),
            date(2011, 1, 3),
            [Season::Spring],
            Weather::ALL,
        )
        .unwrap();
        let view = apply(&records, &criteria);

        let summary = summarize(&view);
        assert_eq!(summary.records, 2);
        assert_eq!(summary.total_rentals, 30);
        assert_eq!(summary.mean_rentals, 15.0);
        assert_eq!(summary.mean_rentals_display, 15.0);
    }

    #[test]
    fn test_empty_view_has_defined_results() {
        let records: Vec<Record> = Vec::new();
        let view = everything(&records);

        let summary = summarize(&view);
        assert_eq!(summary.records, 0);
        assert_eq!(summary.total_rentals, 0);
        assert_eq!(summary.mean_rentals, 0.0);

        assert!(season_totals(&view).is_empty());
        assert!(weather_distribution(&view).is_empty());
        assert!(monthly_trend(&view).is_empty());
        assert!(temperature_categories(&view).is_empty());
        assert!(hourly_profile(&view).is_empty());

        let cmp = day_kind_comparison(&view);
        assert_eq!(cmp.working_day_mean, 0.0);
        assert_eq!(cmp.holiday_mean, 0.0);

        let matrix = correlation_matrix(&view);
        assert!(matrix.values.iter().flatten().all(Option::is_none));
    }

    #[test]
    fn test_season_totals_sum_to_total() {
        let records = three_days();
        let view = everything(&records);

        let totals = season_totals(&view);
        assert_eq!(
            totals,
            vec![
                SeasonTotal {
                    season: Season::Spring,
                    total_rentals: 30
                },
                SeasonTotal {
                    season: Season::Summer,
                    total_rentals: 30
                },
            ]
        );
        let grouped: u64 = totals.iter().map(|t| t.total_rentals).sum();
        assert_eq!(grouped, summarize(&view).total_rentals);
    }

    #[test]
    fn test_weather_distribution_keeps_every_value() {
        let records = three_days();
        let view = everything(&records);

        let dist = weather_distribution(&view);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].weather, Weather::Clear);
        assert_eq!(dist[0].counts, vec![10, 30]);
        assert_eq!(dist[1].weather, Weather::Cloudy);
        assert_eq!(dist[1].counts, vec![20]);
    }

    #[test]
    fn test_monthly_trend_fills_gaps_in_order() {
        let records = vec![
            record(date(2011, 11, 5), Season::Winter, Weather::Clear, 5),
            record(date(2011, 11, 20), Season::Winter, Weather::Clear, 7),
            record(date(2012, 2, 1), Season::Spring, Weather::Clear, 100),
        ];
        let view = everything(&records);

        let trend = monthly_trend(&view);
        let labels: Vec<&str> = trend.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2011-Nov", "2011-Dec", "2012-Jan", "2012-Feb"]);

        let sums: Vec<u64> = trend.iter().map(|b| b.total_rentals).collect();
        assert_eq!(sums, vec![12, 0, 0, 100]);
        assert_eq!(trend[0].month, date(2011, 11, 1));
        assert_eq!(sums.iter().sum::<u64>(), summarize(&view).total_rentals);
    }

    #[test]
    fn test_day_kind_without_holidays_defaults_to_zero() {
        let records = three_days();
        let view = everything(&records);

        let cmp = day_kind_comparison(&view);
        assert_eq!(cmp.working_day_mean, 20.0);
        assert_eq!(cmp.working_day_records, 3);
        assert_eq!(cmp.holiday_mean, 0.0);
        assert_eq!(cmp.holiday_records, 0);
    }

    #[test]
    fn test_day_kind_splits_groups() {
        let mut records = three_days();
        records[0].day_kind = Some(DayKind::Holiday);
        let view = everything(&records);

        let cmp = day_kind_comparison(&view);
        assert_eq!(cmp.holiday_mean, 10.0);
        assert_eq!(cmp.working_day_mean, 25.0);
    }

    #[test]
    fn test_unknown_day_kind_stays_in_view_but_not_in_groups() {
        let mut records = three_days();
        records[0].day_kind = Some(DayKind::Holiday);
        records[2].day_kind = None;
        let view = everything(&records);
        assert_eq!(view.len(), 3);

        let cmp = day_kind_comparison(&view);
        assert_eq!(cmp.holiday_records, 1);
        assert_eq!(cmp.holiday_mean, 10.0);
        assert_eq!(cmp.working_day_records, 1);
        assert_eq!(cmp.working_day_mean, 20.0);
        assert_eq!(summarize(&view).total_rentals, 60);
    }

    #[test]
    fn test_correlation_matrix_is_symmetric() {
        let mut records = three_days();
        records.push(record(date(2011, 1, 4), Season::Spring, Weather::Clear, 5));
        for (r, (t, h, w)) in records.iter_mut().zip([
            (0.1, 0.9, 0.3),
            (0.4, 0.5, 0.1),
            (0.8, 0.3, 0.2),
            (0.2, 0.7, 0.4),
        ]) {
            r.temp = t;
            r.feels_like = t * 0.9 + 0.05;
            r.humidity = h;
            r.wind_speed = w;
        }
        let view = everything(&records);

        let matrix = correlation_matrix(&view);
        for i in Metric::ALL {
            assert_eq!(matrix.get(i, i), Some(1.0));
            for j in Metric::ALL {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
        let temp_atemp = matrix.get(Metric::Temp, Metric::FeelsLike).unwrap();
        assert!((temp_atemp - 1.0).abs() < 1e-9);
        assert!(matrix.get(Metric::Temp, Metric::Count).unwrap() > 0.0);
    }

    #[test]
    fn test_correlation_constant_series_is_undefined() {
        // `record` gives every row the same humidity.
        let records = three_days();
        let view = everything(&records);

        let matrix = correlation_matrix(&view);
        assert_eq!(matrix.get(Metric::Humidity, Metric::Humidity), None);
        assert_eq!(matrix.get(Metric::Humidity, Metric::Count), None);
        assert_eq!(matrix.get(Metric::Count, Metric::Count), Some(1.0));
    }

    #[test]
    fn test_correlation_inexact_constant_is_undefined() {
        let mut records = three_days();
        for (r, count) in records.iter_mut().zip([10, 20, 35]) {
            r.wind_speed = 0.1;
            r.count = count;
        }
        let view = everything(&records);

        let matrix = correlation_matrix(&view);
        assert_eq!(matrix.get(Metric::WindSpeed, Metric::WindSpeed), None);
        assert_eq!(matrix.get(Metric::WindSpeed, Metric::Count), None);
        assert_eq!(matrix.get(Metric::Count, Metric::WindSpeed), None);
        assert_eq!(matrix.get(Metric::Count, Metric::Count), Some(1.0));
    }

    #[test]
    fn test_temperature_categories_sorted_by_mean() {
        let mut records = vec![
            record(date(2011, 1, 1), Season::Spring, Weather::Clear, 100),
            record(date(2011, 1, 2), Season::Spring, Weather::Clear, 300),
            record(date(2011, 1, 3), Season::Spring, Weather::Clear, 500),
            record(date(2011, 1, 4), Season::Spring, Weather::Clear, 700),
        ];
        for (r, t) in records.iter_mut().zip([0.05, 0.65, 0.85, 1.0]) {
            r.temp = t;
        }
        let view = everything(&records);

        let categories = temperature_categories(&view);
        let order: Vec<TempCategory> = categories.iter().map(|c| c.category).collect();
        assert_eq!(
            order,
            vec![TempCategory::Hot, TempCategory::Warm, TempCategory::VeryCold]
        );
        assert_eq!(categories[0].mean_rentals, 600.0);
        assert_eq!(categories[0].records, 2);
    }

    #[test]
    fn test_hourly_profile_groups_by_hour() {
        let mut records = three_days();
        records[0].hour = Some(8);
        records[1].hour = Some(8);
        records[2].hour = Some(17);
        let view = everything(&records);

        let profile = hourly_profile(&view);
        assert_eq!(profile.len(), 2);
        assert_eq!(profile[0].hour, 8);
        assert_eq!(profile[0].mean_rentals, 15.0);
        assert_eq!(profile[1].hour, 17);
        assert_eq!(profile[1].records, 1);
    }
}
