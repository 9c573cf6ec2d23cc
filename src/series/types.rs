//! Data types produced by the historical walk.

use serde::{Deserialize, Serialize};

/// One accepted year of data for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyRecord {
    pub year: i32,
    pub value: Option<f64>,
}

/// Records collected by one walk, in the order they were accepted
/// (most recent first).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesResult {
    records: Vec<YearlyRecord>,
    requests_issued: usize,
}

impl SeriesResult {
    pub(crate) fn new(records: Vec<YearlyRecord>, requests_issued: usize) -> Self {
        Self {
            records,
            requests_issued,
        }
    }

    /// Records as accepted: newest year first.
    pub fn records(&self) -> &[YearlyRecord] {
        &self.records
    }

    /// Records sorted by year ascending, for charting.
    pub fn chronological(&self) -> Vec<YearlyRecord> {
        let mut sorted = self.records.clone();
        sorted.sort_by_key(|r| r.year);
        sorted
    }

    /// The record with the highest year, if any.
    pub fn latest(&self) -> Option<&YearlyRecord> {
        self.records.iter().max_by_key(|r| r.year)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// How many requests the walk issued, including skipped years.
    pub fn requests_issued(&self) -> usize {
        self.requests_issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i32, value: f64) -> YearlyRecord {
        YearlyRecord {
            year,
            value: Some(value),
        }
    }

    #[test]
    fn test_chronological_sorts_ascending() {
        let series = SeriesResult::new(vec![rec(2021, 3.0), rec(2020, 2.0), rec(2018, 1.0)], 4);
        let years: Vec<i32> = series.chronological().iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2018, 2020, 2021]);
        // Accepted order is untouched.
        assert_eq!(series.records()[0].year, 2021);
    }

    #[test]
    fn test_latest_is_highest_year() {
        let series = SeriesResult::new(vec![rec(2019, 1.0), rec(2022, 2.0)], 2);
        assert_eq!(series.latest().map(|r| r.year), Some(2022));
    }

    #[test]
    fn test_empty_series() {
        let series = SeriesResult::default();
        assert!(series.is_empty());
        assert!(series.latest().is_none());
        assert_eq!(series.requests_issued(), 0);
    }
}
