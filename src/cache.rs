//! Per-session, in-memory read-through cache.
//!
//! Holds walked income histories, the latest median income and the crime
//! grade per ZIP code. It is filled once (batch reads, a grades file, or
//! single walks) and then read by the classifier. Nothing is persisted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::classify::{ColorToken, Grade, RankLabel, grade_color, rank_with_letter};
use crate::error::{RaterError, RaterResult};
use crate::fetch::{Response, Transport};
use crate::series::{HistoricalSeriesFetcher, SeriesResult, SeriesWindow};

pub const LATEST_INCOME_PATH: &str = "/median-income/latest";
pub const CRIME_GRADE_PATH: &str = "/crime-grade";

/// A crime grade as delivered by the source. The letter is kept verbatim so
/// that unrecognized letters still count as "grade present".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrimeGrade {
    pub letter: String,
}

impl CrimeGrade {
    pub fn new(letter: impl Into<String>) -> Self {
        Self {
            letter: letter.into(),
        }
    }

    pub fn grade(&self) -> Option<Grade> {
        self.letter.parse().ok()
    }

    pub fn score(&self) -> i32 {
        Grade::score_of(&self.letter)
    }

    pub fn color(&self) -> ColorToken {
        grade_color(&self.letter)
    }
}

#[derive(Default)]
pub struct SessionCache {
    series: RwLock<HashMap<String, SeriesResult>>,
    incomes: RwLock<HashMap<String, Option<f64>>>,
    grades: RwLock<HashMap<String, CrimeGrade>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every ZIP's latest income in one request. No retries; any
    /// outcome other than a well-formed success fails the whole batch.
    #[tracing::instrument(skip_all)]
    pub async fn load_latest_incomes<T: Transport + ?Sized>(&self, transport: &T) -> RaterResult<usize> {
        let payload = batch_payload(transport, LATEST_INCOME_PATH).await?;
        let entries: HashMap<String, Option<f64>> =
            serde_json::from_value(payload).map_err(|e| batch_error(LATEST_INCOME_PATH, e))?;

        let count = entries.len();
        self.incomes.write().await.extend(entries);
        info!(count, "Loaded latest incomes");
        Ok(count)
    }

    /// Reads every ZIP's crime grade in one request.
    #[tracing::instrument(skip_all)]
    pub async fn load_crime_grades<T: Transport + ?Sized>(&self, transport: &T) -> RaterResult<usize> {
        let payload = batch_payload(transport, CRIME_GRADE_PATH).await?;
        let entries: HashMap<String, String> =
            serde_json::from_value(payload).map_err(|e| batch_error(CRIME_GRADE_PATH, e))?;

        Ok(self.insert_grades(entries).await)
    }

    /// Loads crime grades from a local JSON object of `zip -> letter`:
    /// ```json
    /// { "75201": "B+", "75202": "C" }
    /// ```
    pub async fn load_grades_file(&self, path: &str) -> RaterResult<usize> {
        let content = tokio::fs::read_to_string(path).await?;
        let entries: HashMap<String, String> = serde_json::from_str(&content)?;
        Ok(self.insert_grades(entries).await)
    }

    async fn insert_grades(&self, entries: HashMap<String, String>) -> usize {
        let mut grades = self.grades.write().await;
        let count = entries.len();
        for (zip, letter) in entries {
            let grade = CrimeGrade::new(letter);
            if grade.grade().is_none() {
                warn!(zip = %zip, letter = %grade.letter, "Unrecognized crime grade, scoring as neutral");
            }
            grades.insert(zip, grade);
        }
        info!(count, "Loaded crime grades");
        count
    }

    pub async fn insert_income(&self, zip: impl Into<String>, income: Option<f64>) {
        self.incomes.write().await.insert(zip.into(), income);
    }

    pub async fn insert_grade(&self, zip: impl Into<String>, grade: CrimeGrade) {
        self.grades.write().await.insert(zip.into(), grade);
    }

    /// Cached latest income. `None` both when the ZIP is unknown and when
    /// the source reported no value.
    pub async fn latest_income(&self, zip: &str) -> Option<f64> {
        self.incomes.read().await.get(zip).copied().flatten()
    }

    pub async fn grade(&self, zip: &str) -> Option<CrimeGrade> {
        self.grades.read().await.get(zip).cloned()
    }

    /// Returns the cached history for `zip`, or walks it once, caches it and
    /// records its latest accepted value as the ZIP's income. An empty walk is
    /// cached too, as "no value".
    pub async fn series_or_fetch<T: Transport>(
        &self,
        zip: &str,
        fetcher: &HistoricalSeriesFetcher<T>,
        window: &SeriesWindow,
    ) -> RaterResult<SeriesResult> {
        if let Some(series) = self.series.read().await.get(zip) {
            debug!(zip, "Series cache hit");
            return Ok(series.clone());
        }

        let series = fetcher.fetch(zip, window).await?;
        self.insert_income(zip, series.latest().and_then(|r| r.value)).await;
        self.series.write().await.insert(zip.to_string(), series.clone());
        Ok(series)
    }

    /// Rank from whatever is cached for `zip`.
    pub async fn rank_for(&self, zip: &str) -> RankLabel {
        let income = self.latest_income(zip).await;
        let grade = self.grade(zip).await;
        rank_with_letter(income, grade.as_ref().map(|g| g.letter.as_str()))
    }

    /// Every ZIP with a cached income, ranked, ordered by ZIP.
    pub async fn ranked(&self) -> BTreeMap<String, RankLabel> {
        let zips: Vec<String> = self.incomes.read().await.keys().cloned().collect();
        let mut out = BTreeMap::new();
        for zip in zips {
            let label = self.rank_for(&zip).await;
            out.insert(zip, label);
        }
        out
    }
}

async fn batch_payload<T: Transport + ?Sized>(transport: &T, path: &str) -> RaterResult<Value> {
    match transport.get(path).await {
        Response::Success(payload) => Ok(payload),
        Response::NotFound => Err(batch_error(path, "not found")),
        Response::QuotaExceeded => Err(batch_error(path, "quota exceeded")),
        Response::Failure(reason) => Err(batch_error(path, reason)),
    }
}

fn batch_error(path: &str, reason: impl ToString) -> RaterError {
    RaterError::Batch {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
