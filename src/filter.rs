//! Date-range and category filtering over a record set.

use crate::error::CriteriaError;
use crate::model::{Record, Season, Weather};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

/// One user selection: an inclusive date range plus accepted labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    start: NaiveDate,
    end: NaiveDate,
    seasons: BTreeSet<Season>,
    weathers: BTreeSet<Weather>,
}

impl FilterCriteria {
    /// # Errors
    ///
    /// Returns [`CriteriaError::InvertedRange`] when `start` is after `end`.
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        seasons: impl IntoIterator<Item = Season>,
        weathers: impl IntoIterator<Item = Weather>,
    ) -> Result<Self, CriteriaError> {
        if start > end {
            return Err(CriteriaError::InvertedRange { start, end });
        }
        Ok(Self {
            start,
            end,
            seasons: seasons.into_iter().collect(),
            weathers: weathers.into_iter().collect(),
        })
    }

    /// Accepts everything present in `records`: the dashboard's initial state.
    pub fn spanning(records: &[Record]) -> Option<Self> {
        DatasetBounds::of(records).map(DatasetBounds::into_criteria)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn seasons(&self) -> &BTreeSet<Season> {
        &self.seasons
    }

    pub fn weathers(&self) -> &BTreeSet<Weather> {
        &self.weathers
    }

    /// Records with an unmapped season or weather never match.
    pub fn matches(&self, record: &Record) -> bool {
        record.date >= self.start
            && record.date <= self.end
            && record.season.is_some_and(|s| self.seasons.contains(&s))
            && record.weather.is_some_and(|w| self.weathers.contains(&w))
    }
}

/// Order-preserving subset of a record set.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    /// Narrows the view further; used to re-apply criteria to a view.
    pub fn refine(&self, criteria: &FilterCriteria) -> FilteredView<'a> {
        FilteredView {
            records: self.iter().filter(|r| criteria.matches(r)).collect(),
        }
    }
}

/// Returns the records of `records` matching `criteria`, in input order.
pub fn apply<'a>(records: &'a [Record], criteria: &FilterCriteria) -> FilteredView<'a> {
    FilteredView {
        records: records.iter().filter(|r| criteria.matches(r)).collect(),
    }
}

/// What a record set offers for filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetBounds {
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub seasons: Vec<Season>,
    pub weathers: Vec<Weather>,
}

impl DatasetBounds {
    /// `None` for an empty record set.
    pub fn of(records: &[Record]) -> Option<Self> {
        let first = records.iter().map(|r| r.date).min()?;
        let last = records.iter().map(|r| r.date).max()?;
        let seasons: BTreeSet<Season> = records.iter().filter_map(|r| r.season).collect();
        let weathers: BTreeSet<Weather> = records.iter().filter_map(|r| r.weather).collect();

        Some(Self {
            first,
            last,
            seasons: seasons.into_iter().collect(),
            weathers: weathers.into_iter().collect(),
        })
    }

    pub fn into_criteria(self) -> FilterCriteria {
        FilterCriteria {
            start: self.first,
            end: self.last,
            seasons: self.seasons.into_iter().collect(),
            weathers: self.weathers.into_iter().collect(),
        }
    }
}
