use serde::{Deserialize, Serialize};

pub const GREEN_THRESHOLD: f64 = 90.0;
pub const YELLOW_THRESHOLD: f64 = 70.0;
pub const ORANGE_THRESHOLD: f64 = 50.0;

/// Display severity of a 0-100 pronunciation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    Green,
    Yellow,
    Orange,
    Red,
}

impl SeverityBand {
    pub const ALL: &[SeverityBand] = &[
        SeverityBand::Green,
        SeverityBand::Yellow,
        SeverityBand::Orange,
        SeverityBand::Red,
    ];

    /// Maps a score to its band. Lower bounds are inclusive.
    pub fn classify(score: f64) -> Self {
        if score >= GREEN_THRESHOLD {
            SeverityBand::Green
        } else if score >= YELLOW_THRESHOLD {
            SeverityBand::Yellow
        } else if score >= ORANGE_THRESHOLD {
            SeverityBand::Orange
        } else {
            SeverityBand::Red
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityBand::Green => "green",
            SeverityBand::Yellow => "yellow",
            SeverityBand::Orange => "orange",
            SeverityBand::Red => "red",
        }
    }

    /// Short encouragement shown next to an attempt's overall score.
    pub fn feedback(&self) -> &'static str {
        match self {
            SeverityBand::Green => "Excellent!",
            SeverityBand::Yellow => "Very good!",
            SeverityBand::Orange => "Keep practicing",
            SeverityBand::Red => "Try again",
        }
    }

    /// Rank from 0 (green) to 3 (red).
    pub fn severity(&self) -> u8 {
        match self {
            SeverityBand::Green => 0,
            SeverityBand::Yellow => 1,
            SeverityBand::Orange => 2,
            SeverityBand::Red => 3,
        }
    }
}

impl std::fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
