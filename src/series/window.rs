use chrono::Datelike;

use crate::error::{RaterError, RaterResult};

/// Bounds of a single backward walk: start year, oldest allowed year, and sample budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesWindow {
    pub current_year: i32,
    pub min_year: i32,
    pub max_samples: usize,
}

impl SeriesWindow {
    pub fn new(current_year: i32, min_year: i32, max_samples: usize) -> Self {
        Self {
            current_year,
            min_year,
            max_samples,
        }
    }

    /// Window ending at `current_year` (or the present calendar year) and
    /// reaching `years_back` years into the past.
    pub fn years_back(current_year: Option<i32>, years_back: i32, max_samples: usize) -> RaterResult<Self> {
        let current_year = current_year.unwrap_or_else(|| chrono::Utc::now().year());
        let min_year = current_year.checked_sub(years_back).ok_or_else(|| {
            RaterError::invalid_config(format!(
                "years_back {years_back} from {current_year} is out of range"
            ))
        })?;
        Ok(Self::new(current_year, min_year, max_samples))
    }

    pub fn validate(&self) -> RaterResult<()> {
        if self.max_samples == 0 {
            return Err(RaterError::invalid_config("max_samples must be at least 1"));
        }
        if self.min_year > self.current_year {
            return Err(RaterError::invalid_config(format!(
                "min_year {} is after current_year {}",
                self.min_year, self.current_year
            )));
        }
        Ok(())
    }

    /// Number of calendar years the walk may visit.
    pub fn span(&self) -> usize {
        (i64::from(self.current_year) - i64::from(self.min_year) + 1).max(0) as usize
    }
}
