//! Ordinal rank of a ZIP code from median income and, when known, its crime grade.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use super::color::ColorToken;
use super::grade::Grade;

/// Income thresholds for the single-signal mode, highest first.
static INCOME_THRESHOLDS: &[(f64, RankLabel)] = &[
    (120_000.0, RankLabel::S),
    (90_000.0, RankLabel::A),
    (60_000.0, RankLabel::B),
    (30_000.0, RankLabel::C),
];

/// Exclusive lower bounds on the weighted score for the combined mode, highest first.
static WEIGHTED_THRESHOLDS: &[(f64, RankLabel)] = &[
    (25.0, RankLabel::S),
    (15.0, RankLabel::A),
    (5.0, RankLabel::B),
    (0.0, RankLabel::C),
];

/// Income is divided by this before being added to the grade term.
const INCOME_SCALE: f64 = 10_000.0;
/// Multiplier applied to the grade score.
const GRADE_WEIGHT: f64 = 5.0;

/// Rank used for map styling. `S > A > B > C > D`; `NotAvailable` means
/// there was not enough data and does not compare with the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RankLabel {
    S,
    A,
    B,
    C,
    D,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl RankLabel {
    fn level(&self) -> Option<u8> {
        match self {
            RankLabel::S => Some(4),
            RankLabel::A => Some(3),
            RankLabel::B => Some(2),
            RankLabel::C => Some(1),
            RankLabel::D => Some(0),
            RankLabel::NotAvailable => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankLabel::S => "S",
            RankLabel::A => "A",
            RankLabel::B => "B",
            RankLabel::C => "C",
            RankLabel::D => "D",
            RankLabel::NotAvailable => "N/A",
        }
    }

    pub fn is_available(&self) -> bool {
        self.level().is_some()
    }
}

impl PartialOrd for RankLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.level(), other.level()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            (None, None) => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for RankLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighted score for the combined mode: `income / 10_000 + grade_score * 5`.
pub fn weighted_score(income: f64, grade_score: i32) -> f64 {
    income / INCOME_SCALE + grade_score as f64 * GRADE_WEIGHT
}

fn by_income(income: f64) -> RankLabel {
    INCOME_THRESHOLDS
        .iter()
        .find(|(min, _)| income >= *min)
        .map(|(_, label)| *label)
        .unwrap_or(RankLabel::D)
}

fn by_weighted_score(score: f64) -> RankLabel {
    WEIGHTED_THRESHOLDS
        .iter()
        .find(|(bound, _)| score > *bound)
        .map(|(_, label)| *label)
        .unwrap_or(RankLabel::D)
}

/// Ranks a ZIP code.
///
/// Without a grade the income alone is thresholded (120k/90k/60k/30k).
/// With a grade, [`weighted_score`] is thresholded (25/15/5/0, exclusive).
/// A missing income is always [`RankLabel::NotAvailable`], and so is NaN,
/// which no threshold can order. Infinite incomes rank like any other number.
pub fn rank(income: Option<f64>, grade: Option<Grade>) -> RankLabel {
    rank_with_score(income, grade.map(|g| g.score()))
}

/// Like [`rank`] but takes the grade as a raw letter. A letter that is present
/// but unrecognized still selects the combined mode, with a neutral score of 0.
pub fn rank_with_letter(income: Option<f64>, letter: Option<&str>) -> RankLabel {
    rank_with_score(income, letter.map(Grade::score_of))
}

fn rank_with_score(income: Option<f64>, grade_score: Option<i32>) -> RankLabel {
    let Some(income) = income.filter(|v| !v.is_nan()) else {
        return RankLabel::NotAvailable;
    };

    match grade_score {
        None => by_income(income),
        Some(score) => by_weighted_score(weighted_score(income, score)),
    }
}

/// Fill color for a rank.
pub fn color(rank: RankLabel) -> ColorToken {
    match rank {
        RankLabel::S => ColorToken::DARK_GREEN,
        RankLabel::A => ColorToken::GREEN,
        RankLabel::B => ColorToken::LIGHT_GREEN,
        RankLabel::C => ColorToken::ORANGE,
        RankLabel::D => ColorToken::RED,
        RankLabel::NotAvailable => ColorToken::GRAY,
    }
}
