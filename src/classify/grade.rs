//! Crime letter grades and their numeric projection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::color::ColorToken;

/// One of the 13 crime grades, best (`A+`) to worst (`F`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    D,
    #[serde(rename = "D-")]
    DMinus,
    F,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown grade '{0}'")]
pub struct ParseGradeError(pub String);

impl Grade {
    pub const ALL: [Grade; 13] = [
        Grade::APlus,
        Grade::A,
        Grade::AMinus,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::CPlus,
        Grade::C,
        Grade::CMinus,
        Grade::DPlus,
        Grade::D,
        Grade::DMinus,
        Grade::F,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::DMinus => "D-",
            Grade::F => "F",
        }
    }

    /// Integer score used by the combined classifier.
    ///
    /// | Grade | Score | Grade | Score |
    /// |-------|-------|-------|-------|
    /// | A+    | 10    | C+    | 4     |
    /// | A     | 9     | C     | 3     |
    /// | A-    | 8     | C-    | 2     |
    /// | B+    | 7     | D+    | 1     |
    /// | B     | 6     | D     | 0     |
    /// | B-    | 5     | D-    | -1    |
    /// |       |       | F     | -2    |
    pub fn score(&self) -> i32 {
        match self {
            Grade::APlus => 10,
            Grade::A => 9,
            Grade::AMinus => 8,
            Grade::BPlus => 7,
            Grade::B => 6,
            Grade::BMinus => 5,
            Grade::CPlus => 4,
            Grade::C => 3,
            Grade::CMinus => 2,
            Grade::DPlus => 1,
            Grade::D => 0,
            Grade::DMinus => -1,
            Grade::F => -2,
        }
    }

    /// Score for a raw letter; anything unrecognized scores 0.
    pub fn score_of(letter: &str) -> i32 {
        letter.parse::<Grade>().map(|g| g.score()).unwrap_or(0)
    }

    /// Position on the red-to-green gradient.
    pub fn color(&self) -> ColorToken {
        ColorToken::hex(match self {
            Grade::APlus => "#006400",
            Grade::A => "#228B22",
            Grade::AMinus => "#32CD32",
            Grade::BPlus => "#7CFC00",
            Grade::B => "#ADFF2F",
            Grade::BMinus => "#DFFF00",
            Grade::CPlus => "#FFFF00",
            Grade::C => "#FFD700",
            Grade::CMinus => "#FFA500",
            Grade::DPlus => "#FF8C00",
            Grade::D => "#FF4500",
            Grade::DMinus => "#FF2400",
            Grade::F => "#8B0000",
        })
    }
}

impl FromStr for Grade {
    type Err = ParseGradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        Grade::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == normalized)
            .ok_or_else(|| ParseGradeError(s.to_string()))
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color for a raw letter; unmapped input is gray.
pub fn grade_color(letter: &str) -> ColorToken {
    letter
        .parse::<Grade>()
        .map(|g| g.color())
        .unwrap_or(ColorToken::GRAY)
}
