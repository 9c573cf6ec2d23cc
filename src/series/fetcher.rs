//! Bounded backward walk over a ZIP code's yearly median-income history.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::types::{SeriesResult, YearlyRecord};
use super::window::SeriesWindow;
use crate::error::RaterResult;
use crate::fetch::{Response, Transport};

/// Path of the yearly median-income resource for `zip`.
pub fn income_path(year: i32, zip: &str) -> String {
    format!("/median-income/{year}/{zip}")
}

#[derive(Deserialize)]
struct IncomePayload {
    data: IncomeData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomeData {
    #[serde(default)]
    total_household_median_income: Option<f64>,
}

/// Pulls the median income out of a success payload.
///
/// A payload without a `data` object is malformed; a `data` object without an
/// income is a record with no value.
pub fn extract_income(payload: Value) -> Result<Option<f64>, serde_json::Error> {
    let payload: IncomePayload = serde_json::from_value(payload)?;
    Ok(payload.data.total_household_median_income)
}

/// Walks backward one year at a time from `window.current_year` and collects
/// at most `window.max_samples` records no older than `window.min_year`.
///
/// Missing years and transport failures are skipped. A quota signal stops the
/// walk and keeps what was collected.
pub struct HistoricalSeriesFetcher<T> {
    transport: T,
}

impl<T: Transport> HistoricalSeriesFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, zip: &str, window: &SeriesWindow) -> RaterResult<SeriesResult> {
        window.validate()?;

        let mut records = Vec::with_capacity(window.max_samples.min(window.span()));
        let mut requests = 0usize;
        let mut oldest_year_tried = None;

        for year in (window.min_year..=window.current_year).rev() {
            if records.len() >= window.max_samples {
                break;
            }
            requests += 1;
            oldest_year_tried = Some(year);

            match self.transport.get(&income_path(year, zip)).await {
                Response::Success(payload) => match extract_income(payload) {
                    Ok(value) => {
                        debug!(year, ?value, "Accepted yearly record");
                        records.push(YearlyRecord { year, value });
                    }
                    Err(e) => {
                        warn!(year, error = %e, "Malformed payload, skipping year");
                    }
                },
                Response::NotFound => {
                    warn!(year, "No data found, skipping year");
                }
                Response::QuotaExceeded => {
                    warn!(year, collected = records.len(), "Quota exceeded, stopping walk");
                    break;
                }
                Response::Failure(reason) => {
                    warn!(year, reason = %reason, "Request failed, skipping year");
                }
            }
        }

        info!(
            collected = records.len(),
            requests,
            ?oldest_year_tried,
            "Finished historical walk"
        );
        Ok(SeriesResult::new(records, requests))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RaterError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers by year; unlisted years are not found. Records every path asked for.
    #[derive(Default)]
    struct ScriptedTransport {
        by_year: HashMap<i32, Response>,
        default: Option<Response>,
        requested: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn with(mut self, year: i32, response: Response) -> Self {
            self.by_year.insert(year, response);
            self
        }

        fn otherwise(mut self, response: Response) -> Self {
            self.default = Some(response);
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get(&self, path: &str) -> Response {
            self.requested.lock().unwrap().push(path.to_string());
            let year: i32 = path.split('/').nth(2).unwrap().parse().unwrap();
            self.by_year
                .get(&year)
                .or(self.default.as_ref())
                .cloned()
                .unwrap_or(Response::NotFound)
        }
    }

    fn income(value: f64) -> Response {
        Response::Success(json!({"data": {"totalHouseholdMedianIncome": value}}))
    }

    fn years(series: &SeriesResult) -> Vec<i32> {
        series.records().iter().map(|r| r.year).collect()
    }

    #[tokio::test]
    async fn test_all_success_stops_at_sample_budget() {
        let fetcher = HistoricalSeriesFetcher::new(ScriptedTransport::default().otherwise(income(50_000.0)));
        let series = fetcher.fetch("75201", &SeriesWindow::new(2023, 2017, 3)).await.unwrap();

        assert_eq!(years(&series), vec![2023, 2022, 2021]);
        assert_eq!(series.requests_issued(), 3);
        assert_eq!(fetcher.transport().requested().len(), 3);
    }

    #[tokio::test]
    async fn test_all_success_stops_at_min_year() {
        let fetcher = HistoricalSeriesFetcher::new(ScriptedTransport::default().otherwise(income(50_000.0)));
        let series = fetcher.fetch("75201", &SeriesWindow::new(2023, 2022, 5)).await.unwrap();

        assert_eq!(years(&series), vec![2023, 2022]);
        assert_eq!(series.requests_issued(), 2);
    }

    #[tokio::test]
    async fn test_skips_missing_years() {
        let transport = ScriptedTransport::default()
            .with(2021, income(70_000.0))
            .with(2020, income(68_000.0))
            .with(2019, income(66_000.0))
            .with(2018, income(64_000.0));
        let fetcher = HistoricalSeriesFetcher::new(transport);
        let series = fetcher.fetch("75201", &SeriesWindow::new(2023, 2017, 3)).await.unwrap();

        assert_eq!(years(&series), vec![2021, 2020, 2019]);
        assert_eq!(
            fetcher.transport().requested(),
            vec![
                "/median-income/2023/75201",
                "/median-income/2022/75201",
                "/median-income/2021/75201",
                "/median-income/2020/75201",
                "/median-income/2019/75201",
            ]
        );
    }

    #[tokio::test]
    async fn test_quota_exceeded_stops_immediately() {
        let transport = ScriptedTransport::default()
            .with(2023, income(80_000.0))
            .with(2022, Response::QuotaExceeded)
            .otherwise(income(1.0));
        let fetcher = HistoricalSeriesFetcher::new(transport);
        let series = fetcher.fetch("75201", &SeriesWindow::new(2023, 2017, 3)).await.unwrap();

        assert_eq!(years(&series), vec![2023]);
        assert_eq!(fetcher.transport().requested().len(), 2);
    }

    #[tokio::test]
    async fn test_quota_on_first_request_is_empty_not_error() {
        let fetcher =
            HistoricalSeriesFetcher::new(ScriptedTransport::default().otherwise(Response::QuotaExceeded));
        let series = fetcher.fetch("75201", &SeriesWindow::new(2023, 2017, 3)).await.unwrap();

        assert!(series.is_empty());
        assert_eq!(series.requests_issued(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_skipped_like_missing_years() {
        let transport = ScriptedTransport::default()
            .with(2023, Response::Failure("connection reset".into()))
            .with(2022, Response::Success(json!({"unexpected": true})))
            .otherwise(income(40_000.0));
        let fetcher = HistoricalSeriesFetcher::new(transport);
        let series = fetcher.fetch("75201", &SeriesWindow::new(2023, 2017, 2)).await.unwrap();

        assert_eq!(years(&series), vec![2021, 2020]);
        assert_eq!(series.requests_issued(), 4);
    }

    #[tokio::test]
    async fn test_all_missing_visits_every_year() {
        let fetcher = HistoricalSeriesFetcher::new(ScriptedTransport::default());
        let series = fetcher.fetch("75201", &SeriesWindow::new(2023, 2017, 3)).await.unwrap();

        assert!(series.is_empty());
        assert_eq!(series.requests_issued(), 7);
        let requested = fetcher.transport().requested();
        assert_eq!(requested.first().unwrap(), "/median-income/2023/75201");
        assert_eq!(requested.last().unwrap(), "/median-income/2017/75201");
    }

    #[tokio::test]
    async fn test_null_income_is_kept_as_record() {
        let transport = ScriptedTransport::default()
            .otherwise(Response::Success(json!({"data": {"totalHouseholdMedianIncome": null}})));
        let fetcher = HistoricalSeriesFetcher::new(transport);
        let series = fetcher.fetch("75201", &SeriesWindow::new(2023, 2023, 3)).await.unwrap();

        assert_eq!(series.records(), &[YearlyRecord { year: 2023, value: None }]);
    }

    #[tokio::test]
    async fn test_walk_at_lowest_representable_year() {
        let fetcher = HistoricalSeriesFetcher::new(ScriptedTransport::default());
        let series = fetcher
            .fetch("75201", &SeriesWindow::new(i32::MIN, i32::MIN, 1))
            .await
            .unwrap();

        assert!(series.is_empty());
        assert_eq!(fetcher.transport().requested(), vec![format!("/median-income/{}/75201", i32::MIN)]);
    }

    #[tokio::test]
    async fn test_walk_reaching_lowest_year_with_data() {
        let transport = ScriptedTransport::default().otherwise(income(10_000.0));
        let fetcher = HistoricalSeriesFetcher::new(transport);
        let series = fetcher
            .fetch("75201", &SeriesWindow::new(i32::MIN + 1, i32::MIN, 5))
            .await
            .unwrap();

        assert_eq!(years(&series), vec![i32::MIN + 1, i32::MIN]);
    }

    #[tokio::test]
    async fn test_huge_sample_budget_is_bounded_by_years() {
        let fetcher = HistoricalSeriesFetcher::new(ScriptedTransport::default().otherwise(income(1.0)));
        let series = fetcher
            .fetch("75201", &SeriesWindow::new(2023, 2021, usize::MAX))
            .await
            .unwrap();

        assert_eq!(years(&series), vec![2023, 2022, 2021]);
    }

    #[tokio::test]
    async fn test_invalid_window_issues_no_requests() {
        let fetcher = HistoricalSeriesFetcher::new(ScriptedTransport::default());
        let err = fetcher.fetch("75201", &SeriesWindow::new(2023, 2017, 0)).await.unwrap_err();

        assert!(matches!(err, RaterError::InvalidConfiguration { .. }));
        assert!(fetcher.transport().requested().is_empty());
    }

    #[test]
    fn test_extract_income() {
        assert_eq!(
            extract_income(json!({"data": {"totalHouseholdMedianIncome": 55000}})).unwrap(),
            Some(55_000.0)
        );
        assert_eq!(extract_income(json!({"data": {}})).unwrap(), None);
        assert!(extract_income(json!({"year": 2020})).is_err());
    }
}
