use serde::Serialize;

use crate::series::SeriesResult;

const INCOME_LABEL: &str = "Median Income";
const INCOME_BORDER: &str = "#007bff";
const INCOME_FILL: &str = "rgba(0, 123, 255, 0.2)";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: String,
    pub background_color: Option<String>,
}

/// Line-chart input: one x label per year, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl ChartSeries {
    /// Median-income chart for `zip`. Years without a value plot as 0.
    /// Returns `None` for an empty series; there is nothing to draw.
    pub fn from_series(zip: &str, series: &SeriesResult) -> Option<Self> {
        if series.is_empty() {
            return None;
        }

        let records = series.chronological();
        Some(Self {
            title: format!("ZIP: {zip}"),
            labels: records.iter().map(|r| r.year.to_string()).collect(),
            datasets: vec![ChartDataset {
                label: INCOME_LABEL.to_string(),
                data: records.iter().map(|r| r.value.unwrap_or(0.0)).collect(),
                border_color: INCOME_BORDER.to_string(),
                background_color: Some(INCOME_FILL.to_string()),
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{SeriesResult, YearlyRecord};

    #[test]
    fn test_chart_is_chronological_with_zero_for_null() {
        let series = SeriesResult::new(
            vec![
                YearlyRecord { year: 2021, value: Some(70_000.0) },
                YearlyRecord { year: 2020, value: None },
                YearlyRecord { year: 2019, value: Some(66_000.0) },
            ],
            5,
        );
        let chart = ChartSeries::from_series("75201", &series).unwrap();

        assert_eq!(chart.title, "ZIP: 75201");
        assert_eq!(chart.labels, vec!["2019", "2020", "2021"]);
        assert_eq!(chart.datasets[0].data, vec![66_000.0, 0.0, 70_000.0]);
        assert_eq!(chart.datasets[0].label, "Median Income");
    }

    #[test]
    fn test_chart_serializes_with_camel_case_keys() {
        let series = SeriesResult::new(vec![YearlyRecord { year: 2021, value: Some(70_000.0) }], 1);
        let value = serde_json::to_value(ChartSeries::from_series("75201", &series).unwrap()).unwrap();

        let dataset = &value["datasets"][0];
        assert_eq!(dataset["borderColor"], "#007bff");
        assert_eq!(dataset["backgroundColor"], "rgba(0, 123, 255, 0.2)");
        assert!(dataset.get("border_color").is_none());
        assert_eq!(value["labels"][0], "2021");
    }

    #[test]
    fn test_empty_series_has_no_chart() {
        assert!(ChartSeries::from_series("75201", &SeriesResult::default()).is_none());
    }
}
