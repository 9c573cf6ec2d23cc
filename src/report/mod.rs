//! Shapes handed to the renderer, and logging of them.

mod chart;
mod output;

pub use chart::{ChartDataset, ChartSeries};
pub use output::{ZipReport, print_json, print_pretty};
