//! Yearly history retrieval.
//!
//! [`HistoricalSeriesFetcher`] walks backward through the years for one ZIP
//! code, bounded by a [`SeriesWindow`], and returns a [`SeriesResult`].

mod fetcher;
mod types;
mod window;

pub use fetcher::{HistoricalSeriesFetcher, extract_income, income_path};
pub use types::{SeriesResult, YearlyRecord};
pub use window::SeriesWindow;
