//! Output formatting for ranked ZIP codes.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use super::chart::ChartSeries;
use crate::cache::CrimeGrade;
use crate::classify::{self, ColorToken, RankLabel};
use crate::series::{SeriesResult, YearlyRecord};

/// Everything the renderer needs to style and chart one ZIP code.
#[derive(Debug, Clone, Serialize)]
pub struct ZipReport {
    pub zip: String,
    pub records: Vec<YearlyRecord>,
    pub latest_income: Option<f64>,
    pub crime_grade: Option<CrimeGrade>,
    pub grade_color: Option<ColorToken>,
    pub rank: RankLabel,
    pub color: ColorToken,
    pub chart: Option<ChartSeries>,
}

impl ZipReport {
    /// Ranks the latest record of `series`, folding in `grade` when present.
    pub fn build(zip: &str, series: &SeriesResult, grade: Option<CrimeGrade>) -> Self {
        let latest_income = series.latest().and_then(|r| r.value);
        let rank = classify::rank_with_letter(latest_income, grade.as_ref().map(|g| g.letter.as_str()));

        Self {
            zip: zip.to_string(),
            records: series.chronological(),
            latest_income,
            grade_color: grade.as_ref().map(CrimeGrade::color),
            crime_grade: grade,
            rank,
            color: classify::color(rank),
            chart: ChartSeries::from_series(zip, series),
        }
    }
}

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &ZipReport) {
    debug!("{:#?}", report);
    info!(
        zip = %report.zip,
        rank = %report.rank,
        color = %report.color,
        latest_income = ?report.latest_income,
        years = report.records.len(),
        "Ranked ZIP"
    );
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &ZipReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
