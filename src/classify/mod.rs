//! Ranking and coloring of ZIP codes.
//!
//! Everything here is pure: a median income and an optional crime grade go
//! in, a [`RankLabel`] and [`ColorToken`]s come out.

pub mod color;
pub mod grade;
pub mod rank;

pub use color::ColorToken;
pub use grade::{Grade, ParseGradeError, grade_color};
pub use rank::{RankLabel, color, rank, rank_with_letter, weighted_score};
